use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::{debug, info, warn};
use serde::Deserialize;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message};
use tokio::sync::Mutex;

mod action;
mod admin;
mod router;
mod session;
mod storage;
mod views;


use action::*;
use admin::*;
use router::*;
use session::*;
use storage::*;
use views::*;

// Telegram rejects message bodies longer than 4096 characters.
const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Debug, Deserialize, Clone)]
struct Config {
    token: String,
    admin_id: u64,
    #[serde(default)]
    categories: Option<Vec<String>>,
}

impl Config {
    fn global_categories(&self) -> Vec<String> {
        match &self.categories {
            Some(categories) => categories.clone(),
            None => DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    config: PathBuf,
}

struct AppState {
    router: Router,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args.config)?;

    let storage = Arc::new(Storage::new(config.global_categories()));
    let state = Arc::new(AppState {
        router: Router::new(storage, config.admin_id),
    });

    let bot = Bot::new(config.token.clone());

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    info!("bot started, admin is {}", config.admin_id);
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let from = Sender {
        user_id: user.id.0,
        chat_id: msg.chat.id.0,
        first_name: user.first_name.clone(),
        username: user.username.clone(),
    };

    let view = match parse_command(text) {
        Some(command) => state.router.handle_command(&from, command).await,
        None => state.router.handle_text(&from, text).await,
    };

    bot.send_message(msg.chat.id, fit_message(&view.text))
        .reply_markup(keyboard(&view))
        .await?;
    Ok(())
}

async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> Result<()> {
    let Some(data) = q.data.as_deref() else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    let chat_id = match &q.message {
        Some(message) => message.chat.id,
        None => chat_id_from_user_id(q.from.id.0),
    };
    let from = Sender {
        user_id: q.from.id.0,
        chat_id: chat_id.0,
        first_name: q.from.first_name.clone(),
        username: q.from.username.clone(),
    };

    match state.router.handle_action(&from, data).await {
        Reply::Show(view) => {
            let text = fit_message(&view.text);
            let kb = keyboard(&view);
            match &q.message {
                Some(message) => {
                    if let Err(err) = bot
                        .edit_message_text(message.chat.id, message.id, text)
                        .reply_markup(kb)
                        .await
                    {
                        warn!("edit failed for chat {}: {}", message.chat.id, err);
                    }
                }
                None => {
                    bot.send_message(chat_id, text).reply_markup(kb).await?;
                }
            }
            bot.answer_callback_query(q.id).await?;
        }
        Reply::Notice(notice) => {
            bot.answer_callback_query(q.id).text(notice).await?;
        }
    }

    Ok(())
}

fn keyboard(view: &View) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = view
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|choice| {
                    InlineKeyboardButton::callback(choice.label.clone(), choice.action.token())
                })
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

fn fit_message(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_MESSAGE_CHARS - 3).collect();
    clipped.push_str("...");
    clipped
}

fn load_config(path: &Path) -> Result<Config> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config: Config = toml::from_str(&contents).context("parse config")?;
    validate_categories(&config.global_categories())?;
    Ok(config)
}

fn validate_categories(categories: &[String]) -> Result<()> {
    if categories.is_empty() {
        return Err(anyhow!("categories must not be empty"));
    }
    let mut seen = BTreeSet::new();
    for name in categories {
        if let Some(problem) = category_name_problem(name) {
            return Err(anyhow!("invalid category {:?}: {}", name, problem));
        }
        if !seen.insert(name.as_str()) {
            return Err(anyhow!("duplicate category {:?}", name));
        }
    }
    Ok(())
}

fn parse_command(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    let cmd = first.trim_start_matches('/');
    Some(cmd.split('@').next().unwrap_or(cmd))
}

fn chat_id_from_user_id(user_id: u64) -> ChatId {
    ChatId(user_id as i64)
}
