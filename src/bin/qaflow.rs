use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use qaflow::utils::LoggingConfig;
use qaflow::{
    assemble, BotConfig, ChatSession, MenuVariant, MessageSink, NodeView, UploadedFile,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "qaflow", version, about = "Q&A bot flow host", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 在终端中与机器人对话
    Chat {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        variant: Option<MenuVariant>,
        /// 使用本地回显后端，不访问问答接口
        #[arg(long)]
        echo: bool,
        /// 以已登录用户身份对话
        #[arg(long)]
        logged_in: bool,
    },
    /// 输出组装后的对话图
    Graph {
        #[arg(long, default_value_t = MenuVariant::Extended)]
        variant: MenuVariant,
    },
    /// 输出宿主组件设置
    Settings {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// 终端输出：流式前缀只打印新增的部分
#[derive(Default)]
struct TerminalSink {
    streamed: Mutex<String>,
}

impl TerminalSink {
    fn finish_stream(&self) {
        let mut streamed = self.streamed.lock();
        if !streamed.is_empty() {
            println!();
            streamed.clear();
        }
    }
}

#[async_trait]
impl MessageSink for TerminalSink {
    async fn inject_message(&self, text: &str) {
        self.finish_stream();
        println!("bot> {text}");
    }

    async fn stream_message(&self, partial: &str) {
        let mut streamed = self.streamed.lock();
        match partial.strip_prefix(streamed.as_str()) {
            Some(delta) if !streamed.is_empty() => print!("{delta}"),
            _ => {
                if !streamed.is_empty() {
                    println!();
                }
                print!("bot> {partial}");
            }
        }
        io::stdout().flush().ok();
        *streamed = partial.to_string();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Chat {
            config,
            variant,
            echo,
            logged_in,
        } => handle_chat(config, variant, echo, logged_in).await?,
        Command::Graph { variant } => handle_graph(variant)?,
        Command::Settings { config } => handle_settings(config).await?,
    }
    Ok(())
}

async fn load_config(path: Option<PathBuf>) -> anyhow::Result<BotConfig> {
    Ok(match path {
        Some(path) => BotConfig::load(path).await?,
        None => BotConfig::from_env(),
    })
}

async fn handle_chat(
    config: Option<PathBuf>,
    variant: Option<MenuVariant>,
    echo: bool,
    logged_in: bool,
) -> anyhow::Result<()> {
    let mut bot = load_config(config).await?;
    if let Some(variant) = variant {
        bot.variant = variant;
    }
    if logged_in {
        bot.is_logged_in = true;
    }
    if bot.is_disabled() {
        println!("{}", qaflow::widget::DISABLED_PLACEHOLDER);
        return Ok(());
    }

    let sink = Arc::new(TerminalSink::default());
    let mut session = ChatSession::from_config(&bot.flow_config(echo)?, sink.clone())?;
    println!("{}", bot.prompt);
    println!("(commands: /attach PATH..., /remove INDEX, /restart, /quit)");

    let mut view = session.start().await?;
    render_view(&view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let next = match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/restart", _) => session.restart().await,
            ("/attach", paths) => {
                attach(&mut session, paths).await;
                continue;
            }
            ("/remove", index) => {
                match index.trim().parse::<usize>() {
                    Ok(index) => match session.remove_file(index) {
                        Ok(()) => list_files(session.uploaded_files()),
                        Err(err) => println!("!! {err}"),
                    },
                    Err(_) => println!("!! usage: /remove INDEX"),
                }
                continue;
            }
            _ => {
                let Some(input) = choose(&view, line) else {
                    qaflow::log_warn!("free text rejected", node = view.node.as_str());
                    println!("!! please pick one of the options");
                    render_view(&view);
                    continue;
                };
                session.respond(&input).await
            }
        };
        sink.finish_stream();

        match next {
            Ok(next) => {
                view = next;
                render_view(&view);
            }
            Err(err) => {
                qaflow::log_error!(err);
                println!("!! {err}");
            }
        }
    }
    Ok(())
}

/// 数字选择对应的选项；只允许选项的节点拒绝自由输入
fn choose(view: &NodeView, line: &str) -> Option<String> {
    if let Some(option) = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| view.options.get(index))
    {
        return Some(option.clone());
    }
    if view.input_locked && !view.options.iter().any(|option| option == line) {
        return None;
    }
    Some(line.to_string())
}

async fn attach(session: &mut ChatSession, paths: &str) {
    let mut files = Vec::new();
    for path in paths.split_whitespace() {
        match UploadedFile::from_disk(path).await {
            Ok(file) => files.push(file),
            Err(err) => {
                println!("!! {err}");
                return;
            }
        }
    }
    match session.upload_files(files) {
        Ok(()) => list_files(session.uploaded_files()),
        Err(err) => println!("!! {err}"),
    }
}

fn list_files(files: &[UploadedFile]) {
    if files.is_empty() {
        println!("   (no files selected)");
    }
    for (index, file) in files.iter().enumerate() {
        println!("   {index}: {} ({} bytes, {})", file.name, file.size, file.content_type);
    }
}

fn render_view(view: &NodeView) {
    for (index, option) in view.options.iter().enumerate() {
        println!("   [{}] {}", index + 1, option);
    }
    if view.file_upload {
        println!("   (attach files with /attach PATH...)");
    }
}

fn handle_graph(variant: MenuVariant) -> anyhow::Result<()> {
    let config = BotConfig {
        variant,
        ..BotConfig::default()
    };
    let graph = assemble(&config.flow_config(true)?)?;
    println!("{}", serde_json::to_string_pretty(&graph.describe())?);
    Ok(())
}

async fn handle_settings(config: Option<PathBuf>) -> anyhow::Result<()> {
    let bot = load_config(config).await?;
    println!("{}", serde_json::to_string_pretty(&bot.widget_settings())?);
    Ok(())
}
