//! remark - threaded comments with nested replies

mod cli;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::commands::{
    run_comments_add, run_comments_show, run_comments_tree, run_init, run_threads_add,
    run_threads_show,
};
use cli::{Cli, Commands, CommentsCommands, ThreadsCommands};
use output::OutputFormat;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(cli.json_logs);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let db_path = cli.db.as_path();

    match cli.command {
        Commands::Init => {
            run_init(db_path, format)?;
        }

        Commands::Threads(cmd) => match cmd {
            ThreadsCommands::Add {
                identifier,
                permalink,
            } => {
                run_threads_add(db_path, &identifier, permalink, format)?;
            }
            ThreadsCommands::Show {
                identifier,
                permalink,
            } => {
                run_threads_show(db_path, identifier, permalink, format)?;
            }
        },

        Commands::Comments(cmd) => match cmd {
            CommentsCommands::Add {
                thread,
                message_positional,
                message,
                reply_to,
            } => {
                // Support both --message and positional argument
                let msg = message.or(message_positional).ok_or_else(|| {
                    anyhow::anyhow!("Message is required (use --message or provide as argument)")
                })?;
                run_comments_add(
                    db_path,
                    &thread,
                    &msg,
                    reply_to,
                    cli.author.as_deref(),
                    format,
                )?;
            }
            CommentsCommands::Show { id } => {
                run_comments_show(db_path, id, format)?;
            }
            CommentsCommands::Tree { thread } => {
                run_comments_tree(db_path, &thread, format)?;
            }
        },
    }

    Ok(())
}
