use crate::flow::assembler::Subgraph;
use crate::flow::context::FlowConfig;
use crate::flow::ids::NodeId;
use crate::flow::nodes::FlowNode;

pub const MENU_ASK: &str = "Ask a question about ACCESS";
pub const MENU_HELP_TICKET: &str = "Open a Help Ticket";
pub const MENU_DEV_TICKET: &str = "Report a problem to the developers";
pub const MENU_FEEDBACK: &str = "Give feedback";

/// 扩展菜单，覆盖连续问答的 `start`
///
/// 菜单上直接输入的文本按问题处理，进入 `loop`。
pub fn main_menu(config: &FlowConfig) -> Subgraph {
    let start = FlowNode::new(NodeId::Start, config.welcome.as_str())
        .options([MENU_ASK, MENU_HELP_TICKET, MENU_DEV_TICKET, MENU_FEEDBACK])
        .branch(
            [
                NodeId::GoAheadAndAsk,
                NodeId::HelpTicket,
                NodeId::DevTicket,
                NodeId::Feedback,
                NodeId::Loop,
            ],
            |turn| match turn.input().trim() {
                MENU_ASK => NodeId::GoAheadAndAsk,
                MENU_HELP_TICKET => NodeId::HelpTicket,
                MENU_DEV_TICKET => NodeId::DevTicket,
                MENU_FEEDBACK => NodeId::Feedback,
                _ => NodeId::Loop,
            },
        );

    Subgraph::new("main_menu")
        .node(start)
        .overrides(NodeId::Start)
}
