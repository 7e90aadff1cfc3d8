mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, Component};
use forumkit::config::Config;
use forumkit::render::{CategoriesPage, CategoryNode, NoHooks};
use forumkit::theme::button::{button_classes, button_utility_classes, button_variables_json};
use forumkit::theme::global_variables;
use forumkit::ForumKit;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forumkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        config.database_url = Some(url);
    }

    let kit = if cli.memory {
        ForumKit::in_memory(&config)?
    } else {
        ForumKit::connect(&config, true).await?
    };

    match cli.command {
        Commands::Embed { url, refresh } => {
            let embed = kit.create_embed(&url, refresh).await?;
            println!("{}", serde_json::to_string_pretty(&embed)?);
        }
        Commands::Providers => {
            for embed_type in kit.embed_types() {
                println!("{}", embed_type);
            }
        }
        Commands::Theme { component, css } => {
            let themes = kit.themes();
            match (component, css) {
                (Component::Global, false) => {
                    println!("{}", serde_json::to_string_pretty(&*global_variables(themes))?);
                }
                (Component::Global, true) => bail!("no CSS is generated for the global component; use --component button"),
                (Component::Button, false) => {
                    println!("{}", serde_json::to_string_pretty(&button_variables_json(themes))?);
                }
                (Component::Button, true) => {
                    for class in button_classes(themes).values().filter(|c| !c.class_name.is_empty()) {
                        println!("{}", class.css);
                    }
                    let utils = button_utility_classes(themes);
                    for class in [&utils.push_left, &utils.push_right] {
                        println!("{}", class.css);
                    }
                }
            }
        }
        Commands::Categories { file, title, description } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let tree: Vec<CategoryNode> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing category tree in {}", file.display()))?;
            let page = CategoriesPage { title, description, tree };
            println!("{}", kit.render_categories(&page, &NoHooks));
        }
        Commands::ClearCache { prefix } => {
            let removed = kit.clear_embed_cache(prefix.as_deref()).await?;
            tracing::info!(removed, "cleared embed cache");
            println!("{}", removed);
        }
    }

    Ok(())
}
