//! # Starsite Chat Command
//!
//! File: cli/src/commands/chat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs the chat widget in the terminal. Each line read from stdin is a
//! submitted message; the bot's reply is shown after the configured typing
//! delay. The conversation is saved to the persistent store after every
//! message and restored on the next run.
//!
//! The loop ends on `/exit` or end of input. Replies still waiting for
//! their delay are shown before the command returns.
//!
//! ```bash
//! starsite chat
//! echo "hola" | starsite chat
//! starsite chat --fresh   # forget the saved conversation first
//! ```
//!
use super::open_store;
use anyhow::Context;
use clap::Parser;
use starsite::chatbot::conversation::CONVERSATION_KEY;
use starsite::chatbot::{self, ChatWidget, ConversationEntry, Sender};
use starsite::common::store::{FileStore, KeyValueStore};
use starsite::core::config::Config;
use starsite::core::error::Result;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

const EXIT_COMMAND: &str = "/exit";

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Forget the saved conversation before starting.
    #[arg(long)]
    pub fresh: bool,
}

pub async fn handle_chat(args: ChatArgs, cfg: &Config) -> Result<()> {
    info!("Handling chat command (fresh: {})", args.fresh);

    let mut store = open_store(cfg)?;
    if args.fresh {
        store.remove(CONVERSATION_KEY)?;
    }

    let matcher = chatbot::load_matcher(Path::new(&cfg.chatbot.responses)).await;
    let mut widget = ChatWidget::new(matcher, store);
    for entry in widget.start()? {
        print_entry(entry);
    }
    println!("(escribe {} para salir)", EXIT_COMMAND);

    let delay = cfg.chatbot.typing_delay();

    // Replies are queued with their due time and released in submission order.
    let (queue_tx, mut queue_rx) = mpsc::unbounded_channel::<(Instant, String)>();
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        while let Some((due, reply)) = queue_rx.recv().await {
            tokio::time::sleep_until(due).await;
            if reply_tx.send(reply).is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line.context("Failed to read from stdin")? {
                    Some(line) => line,
                    None => {
                        debug!("End of input");
                        break;
                    }
                };
                if line.trim() == EXIT_COMMAND {
                    break;
                }
                if let Some(reply) = widget.submit(&line)? {
                    // Sending only fails once the delivery task is gone.
                    let _ = queue_tx.send((Instant::now() + delay, reply));
                }
            }
            Some(reply) = reply_rx.recv() => {
                show_reply(&mut widget, &reply)?;
            }
        }
    }

    drop(queue_tx);
    while let Some(reply) = reply_rx.recv().await {
        show_reply(&mut widget, &reply)?;
    }

    info!(
        "Chat ended with {} messages saved",
        widget.conversation().len()
    );
    Ok(())
}

fn show_reply(widget: &mut ChatWidget<FileStore>, reply: &str) -> Result<()> {
    widget.display(reply, Sender::Bot)?;
    print_entry(&ConversationEntry::new(reply, Sender::Bot));
    Ok(())
}

fn print_entry(entry: &ConversationEntry) {
    let label = match entry.sender {
        Sender::User => "🧑 Tú",
        Sender::Bot => "🤖 Bot",
    };
    println!("{}: {}", label, entry.text);
}
