pub mod config;
pub mod error;
pub mod flow;
pub mod forms;
pub mod qa;
pub mod runtime;
pub mod submission;
pub mod utils;
pub mod widget;

pub use config::{BotConfig, EnvConfig};
pub use error::{QaFlowError, Result};
pub use flow::{
    assemble, FlowAssembler, FlowConfig, FlowGraph, FlowNode, MenuVariant, NextNode, NodeId,
    NodeMessage, Subgraph,
};
pub use forms::{FieldValue, FileUploadSurface, FormState, FormStore, UploadMode, UploadedFile};
pub use qa::{
    classify, DynQaBackend, ErrorInput, HttpQaClient, LocalEchoBackend, QaBackend, QaFailure,
    ResponseStreamer,
};
pub use runtime::{ChatSession, DynMessageSink, MessageSink, NodeView, RecordingSink, Turn};
pub use submission::{
    build_submission, DynTicketSubmitter, LocalSubmitter, ProxyOutcome, ProxySubmitter,
    SubmissionPayload, TicketSubmitter, TicketType,
};
pub use utils::logging;
pub use widget::{resolve_theme, ThemeColors, WidgetSettings};
