//! Reagent CLI
//!
//! Command-line interface for the research agent: interactive chat, direct
//! tool invocations, and a demo that mounts the bundled MCP server.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use reagent::agent::ResearchAgent;
use reagent::calc;
use reagent::config::{Config, ProviderConfig};
use reagent::mcp::{McpClient, McpToolBridge};
use reagent::tools::{basic_registry, ToolRegistry};
use reagent::units::ConversionRequest;
use reagent::{Error, Result, VERSION};

#[allow(unused_imports)]
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "reagent",
    version = VERSION,
    about = "Reagent - a tool-using research agent",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat with the agent
    Chat {
        /// Model to use (overrides the backend default)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the available tools
    Tools,

    /// Evaluate a math expression without the LLM
    Calc {
        /// Expression, e.g. "sqrt(16) + 2 ** 3"
        expression: String,
    },

    /// Convert units without the LLM, e.g. "100 meters to feet"
    Convert {
        /// Conversion request
        input: String,
    },

    /// Spawn the bundled MCP server and exercise its tools
    McpDemo,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reagent=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat { model }) => interactive_chat(model).await,
        Some(Commands::Tools) => list_tools(),
        Some(Commands::Calc { expression }) => run_calc(&expression),
        Some(Commands::Convert { input }) => run_convert(&input),
        Some(Commands::McpDemo) => mcp_demo().await,
        None => interactive_chat(None).await,
    }
}

/// Get the dialoguer theme
fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn print_banner() {
    println!();
    println!("{}", style("╔══════════════════════════════════════════════════╗").cyan());
    println!("{}", style("║            🔬 Reagent Research Agent             ║").cyan());
    println!("{}", style("╚══════════════════════════════════════════════════╝").cyan());
    println!();
}

fn build_registry() -> Result<Arc<ToolRegistry>> {
    let config = Config::from_env()?;
    Ok(Arc::new(basic_registry(config.workspace)))
}

// ============================================================================
// Interactive Chat
// ============================================================================

async fn interactive_chat(model: Option<String>) -> Result<()> {
    let mut provider = match ProviderConfig::from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            eprintln!();
            eprintln!("   Set one of DEEPSEEK_API_KEY, OPENAI_API_KEY, or ANTHROPIC_API_KEY");
            eprintln!("   (in the environment or a .env file) and try again.");
            return Err(e);
        }
    };
    if let Some(m) = model {
        provider.model = m;
    }

    let registry = build_registry()?;
    let agent = ResearchAgent::new(provider, registry.clone());

    print_banner();
    println!(
        "   {} Provider: {} ({})",
        style("✓").green(),
        style(agent.backend()).cyan(),
        style(agent.model()).cyan()
    );
    println!(
        "   {} Tools: {}",
        style("✓").green(),
        style(registry.count()).cyan()
    );
    println!();
    println!("   {}", style("Commands:").dim());
    println!("   {}  - Exit chat", style("/quit").yellow());
    println!("   {} - List available tools", style("/tools").yellow());
    println!("   {}  - Show this help", style("/help").yellow());
    println!();

    loop {
        let user_input: String = Input::with_theme(&theme())
            .with_prompt(style("You").green().bold().to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Config(format!("Input error: {}", e)))?;

        let input = user_input.trim();

        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "/quit" | "/exit" | "/q" | "quit" | "exit" => {
                println!("\n{} Goodbye!\n", style("👋").bold());
                break;
            }
            "/tools" | "/t" => {
                print_tool_list(&registry);
                continue;
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("   {}", style("Available Commands:").cyan().bold());
                println!("   {}  - Exit chat", style("/quit").yellow());
                println!("   {} - List available tools", style("/tools").yellow());
                println!("   {}  - Show help", style("/help").yellow());
                println!();
                continue;
            }
            other if other.starts_with('/') => {
                println!(
                    "   {} Unknown command. Type {} for help.\n",
                    style("⚠").yellow(),
                    style("/help").cyan()
                );
                continue;
            }
            _ => {}
        }

        println!("   {}", style("thinking...").dim());
        match agent.run(input).await {
            Ok(answer) => {
                println!("\n   {}: {}\n", style("Agent").cyan().bold(), answer);
            }
            Err(e) => {
                println!("\n   {} Error: {}\n", style("❌").red(), e);
            }
        }
    }

    Ok(())
}

// ============================================================================
// Direct Tool Commands
// ============================================================================

fn print_tool_list(registry: &ToolRegistry) {
    let mut defs = registry.definitions();
    defs.sort_by(|a, b| a.function.name.cmp(&b.function.name));
    println!();
    for def in defs {
        println!(
            "   {} {}",
            style(format!("{:<16}", def.function.name)).cyan().bold(),
            style(&def.function.description).dim()
        );
    }
    println!();
}

fn list_tools() -> Result<()> {
    let registry = build_registry()?;
    print_banner();
    println!("   {} registered tools:", style(registry.count()).green().bold());
    print_tool_list(&registry);
    Ok(())
}

fn run_calc(expression: &str) -> Result<()> {
    match calc::evaluate(expression) {
        Ok(value) => {
            println!("{}", calc::format_result(expression, value));
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}

fn run_convert(input: &str) -> Result<()> {
    let request: ConversionRequest = input.parse()?;
    let line = request.format()?;
    println!("{}", line);
    Ok(())
}

// ============================================================================
// MCP Demo
// ============================================================================

/// Spawn the bundled `reagent-mcp` server, mount its tools through the
/// bridge, and run a few calls to show the wiring end to end.
async fn mcp_demo() -> Result<()> {
    print_banner();

    let server_bin =
        std::env::var("REAGENT_MCP_BIN").unwrap_or_else(|_| "reagent-mcp".to_string());
    println!("   Spawning MCP server: {}", style(&server_bin).cyan());

    let client = Arc::new(McpClient::connect_stdio(&server_bin).await?);
    let mut registry = ToolRegistry::new();
    let mounted = McpToolBridge::mount(client.clone(), &mut registry).await?;

    println!(
        "   {} Connected, {} tools:",
        style("✓").green(),
        style(mounted).green().bold()
    );
    print_tool_list(&registry);

    let demos = [
        (
            "calculate",
            serde_json::json!({"expression": "sqrt(16) + 2 ** 3"}),
        ),
        (
            "convert_units",
            serde_json::json!({"value": 100.0, "from_unit": "meters", "to_unit": "feet"}),
        ),
        ("calculate", serde_json::json!({"expression": "1 / 0"})),
    ];

    for (tool, args) in demos {
        println!("   {} {}({})", style("→").dim(), style(tool).cyan(), args);
        let text = client.call_tool_text(tool, args).await?;
        println!("   {} {}\n", style("←").dim(), text);
    }

    // Release the bridges' handles so the client can be shut down.
    drop(registry);
    if let Ok(client) = Arc::try_unwrap(client) {
        client.shutdown().await?;
    }

    Ok(())
}
