use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::QaFlowError;

macro_rules! node_ids {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// 对话图中所有节点的标识（封闭枚举）
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeId {
            $($variant),+
        }

        impl NodeId {
            pub const ALL: &'static [NodeId] = &[$(NodeId::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(NodeId::$variant => $name),+
                }
            }
        }

        impl FromStr for NodeId {
            type Err = QaFlowError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(NodeId::$variant),)+
                    other => Err(QaFlowError::UnknownNode(other.to_string())),
                }
            }
        }
    };
}

node_ids! {
    Start => "start",
    Loop => "loop",
    GoAheadAndAsk => "go_ahead_and_ask",
    QaLoop => "qa_loop",
    HelpTicket => "help_ticket",
    AskName => "ask_name",
    AskColor => "ask_color",
    SubmitTicket => "submit_ticket",
    DevTicket => "dev_ticket",
    DevTicketEmail => "dev_ticket_email",
    DevTicketAccessId => "dev_ticket_accessid",
    DevTicketSummary => "dev_ticket_summary",
    DevTicketDescription => "dev_ticket_description",
    DevTicketAttachment => "dev_ticket_attachment",
    DevTicketUpload => "dev_ticket_upload",
    DevTicketGrandSummary => "dev_ticket_grand_summary",
    Feedback => "feedback",
    FeedbackPleaseTellUsMore => "feedback_please_tell_us_more",
    FeedbackUpload => "feedback_upload",
    FeedbackUploadYes => "feedback_upload_yes",
    FeedbackContact => "feedback_contact",
    FeedbackContactYes => "feedback_contact_yes",
    FeedbackSummary => "feedback_summary",
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
