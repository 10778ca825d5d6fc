//! Command-line client for company profile research

use anyhow::Context;
use clap::{Parser, Subcommand};
use profile_agent::display::{render_chat_reply, render_profile, render_records};
use profile_agent::gateway::{self, ResearchGateway};
use profile_agent::{
    ChatOptions, GatewayMode, JsonFileStore, Operation, Orchestrator, ProfileConfig,
    ReasoningTier, View,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

type Agent = Orchestrator<Arc<dyn ResearchGateway>, JsonFileStore>;

const STEP_DELAY: Duration = Duration::from_millis(800);

#[derive(Parser, Debug)]
#[command(name = "profile-agent")]
#[command(about = "Research public companies with a web-grounded model", long_about = None)]
struct Args {
    /// Gateway to use: direct (needs GEMINI_API_KEY) or proxy
    #[arg(long, global = true)]
    gateway: Option<GatewayMode>,

    /// Proxy server URL
    #[arg(long, global = true)]
    proxy_url: Option<String>,

    /// Result store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Show a mock profile when the backend cannot be reached
    #[arg(long, global = true)]
    mock_fallback: bool,

    /// Print agent steps without pausing between them
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Research a company (cached unless --refresh)
    Search {
        query: String,
        /// Ignore the saved result and research again
        #[arg(short, long)]
        refresh: bool,
    },
    /// List saved companies
    List,
    /// Ask the assistant a question
    Chat {
        message: String,
        /// Let the assistant search the web
        #[arg(long)]
        web: bool,
        /// Use the extended reasoning model
        #[arg(long)]
        extended: bool,
        /// Company the question is about
        #[arg(long)]
        context: Option<String>,
    },
    /// Interactive session (default)
    Repl,
}

fn load_config(args: &Args) -> anyhow::Result<ProfileConfig> {
    let mut builder = ProfileConfig::builder();
    if let Some(mode) = args.gateway {
        builder = builder.gateway_mode(mode);
    }
    if let Some(url) = &args.proxy_url {
        builder = builder.proxy_url(url);
    }
    if let Some(path) = &args.store {
        builder = builder.store_path(path);
    }
    if args.mock_fallback {
        builder = builder.fallback_to_mock(true);
    }
    builder.with_env()?.build().context("Invalid configuration")
}

async fn print_steps(steps: &[String], fast: bool) {
    for step in steps {
        println!("  > {step}");
        if !fast {
            tokio::time::sleep(STEP_DELAY).await;
        }
    }
}

async fn search(agent: &mut Agent, query: &str, refresh: bool, fast: bool) {
    let cached = !refresh && agent.is_cached(query);
    if !cached && !query.trim().is_empty() {
        println!("Researching \"{}\"...", query.trim());
    }
    match agent.search(query, refresh).await {
        Ok(result) => {
            if !cached {
                print_steps(&result.agent_steps, fast).await;
            }
            println!("{}", render_profile(&result));
        }
        Err(_) => {
            if let Some(error) = &agent.state().error {
                eprintln!("{error}");
            }
        }
    }
}

async fn chat(
    gateway: &dyn ResearchGateway,
    message: &str,
    options: ChatOptions,
    context: Option<&str>,
) {
    match gateway.send_message(message, options, context).await {
        Ok(reply) => println!("{}", render_chat_reply(&reply)),
        Err(err) => eprintln!("{}", err.user_message(Operation::Chat)),
    }
}

fn print_help() {
    println!(
        "Commands:\n  \
         /search <company>   research a company (plain text does the same)\n  \
         /refresh            research the current company again\n  \
         /open <n>           open saved result number n\n  \
         /back               return to the dashboard\n  \
         /list               list saved companies\n  \
         /chat [--web] [--extended] <question>\n  \
         /help               show this help\n  \
         /exit               quit"
    );
}

fn parse_chat(input: &str) -> (ChatOptions, String) {
    let mut options = ChatOptions::default();
    let mut words = Vec::new();
    for word in input.split_whitespace() {
        match word {
            "--web" => options.web_search = true,
            "--extended" => options.tier = ReasoningTier::Extended,
            other => words.push(other),
        }
    }
    (options, words.join(" "))
}

async fn repl(agent: &mut Agent, fast: bool) -> anyhow::Result<()> {
    println!("{}", render_records(&agent.records()));
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nprofile> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "/exit" | "/quit" => break,
            "/help" => print_help(),
            "/list" => println!("{}", render_records(&agent.records())),
            "/back" => {
                agent.back();
                println!("{}", render_records(&agent.records()));
            }
            "/refresh" => {
                let query = agent.state().query.clone();
                if query.is_empty() {
                    println!("Nothing to refresh yet.");
                } else {
                    search(agent, &query, true, fast).await;
                }
            }
            "/open" => {
                let selected = rest
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| agent.records().get(index).map(|r| (*r).clone()));
                match selected {
                    Some(result) => {
                        println!("{}", render_profile(&result));
                        agent.select_record(result);
                    }
                    None => println!("No saved result with that number."),
                }
            }
            "/chat" => {
                let (options, message) = parse_chat(rest);
                if message.is_empty() {
                    println!("Usage: /chat [--web] [--extended] <question>");
                    continue;
                }
                let context = (agent.state().view == View::Profile)
                    .then(|| agent.state().query.clone());
                chat(agent.gateway().as_ref(), &message, options, context.as_deref()).await;
            }
            "/search" => search(agent, rest, false, fast).await,
            _ if command.starts_with('/') => {
                println!("Unknown command {command}. Type /help for commands.");
            }
            _ => search(agent, line, false, fast).await,
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    agent_utils::init_tracing_with("warn", agent_utils::LogFormat::from_env());

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(?config, "Starting profile-agent");

    let gateway = gateway::build(&config)?;
    let store = JsonFileStore::new(&config.store_path);
    let mut agent = Orchestrator::new(gateway, store);

    match args.command.unwrap_or(Command::Repl) {
        Command::Search { query, refresh } => search(&mut agent, &query, refresh, args.fast).await,
        Command::List => println!("{}", render_records(&agent.records())),
        Command::Chat {
            message,
            web,
            extended,
            context,
        } => {
            let options = ChatOptions {
                web_search: web,
                tier: if extended {
                    ReasoningTier::Extended
                } else {
                    ReasoningTier::Standard
                },
            };
            chat(agent.gateway().as_ref(), &message, options, context.as_deref()).await;
        }
        Command::Repl => repl(&mut agent, args.fast).await?,
    }

    Ok(())
}
