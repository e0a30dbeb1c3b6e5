//! Safari command-line interface.
//!
//! Manipulate Safari's windows and tabs from the terminal and search its
//! bookmarks, history and iCloud tabs.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use safari_use::{CloseTarget, TabActivator, bookmarks, cloud, history};
use serde::Serialize;
use std::process::ExitCode;

/// Result cap for interactive history searches.
const HISTORY_SEARCH_LIMIT: usize = 20;

#[derive(Parser)]
#[command(name = "safari", version, about = "Manipulate Safari and search its data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Activate a Safari window or tab
    #[command(alias = "a")]
    Activate {
        /// The window to activate (1-based)
        #[arg(allow_hyphen_values = true)]
        window: String,
        /// The tab to activate (1-based; 0 or omitted raises the window
        /// without switching tabs)
        #[arg(allow_hyphen_values = true)]
        tab: Option<String>,
    },
    /// List Safari tabs, bookmarks, folders, Reading List or iCloud tabs
    #[command(alias = "l")]
    List {
        /// What to list
        #[arg(value_enum)]
        kind: ListKind,
        /// Output JSON instead of text
        #[arg(short, long)]
        json: bool,
    },
    /// Close Safari windows and/or tabs
    #[command(alias = "c")]
    Close {
        /// What to close
        #[arg(value_enum)]
        target: CloseWhat,
        /// The target window (default: frontmost)
        #[arg(default_value_t = 1)]
        window: usize,
        /// The target tab (default: the window's current tab)
        #[arg(default_value_t = 0)]
        tab: usize,
    },
    /// Search Safari's history
    History {
        /// Substring to match against page titles
        query: String,
        /// Output JSON instead of text
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListKind {
    Tabs,
    Bookmarks,
    Folders,
    Readlist,
    Cloud,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CloseWhat {
    Win,
    Tab,
    TabsOther,
    TabsLeft,
    TabsRight,
}

impl From<CloseWhat> for CloseTarget {
    fn from(what: CloseWhat) -> Self {
        match what {
            CloseWhat::Win => CloseTarget::Window,
            CloseWhat::Tab => CloseTarget::Tab,
            CloseWhat::TabsOther => CloseTarget::TabsOther,
            CloseWhat::TabsLeft => CloseTarget::TabsLeft,
            CloseWhat::TabsRight => CloseTarget::TabsRight,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Activate { window, tab } => {
            // Raw strings go through the activator so its leading-integer
            // parsing and diagnostics apply unchanged
            let mut args = vec![window];
            args.extend(tab);
            TabActivator::new().run(&args)?;
            Ok(())
        }
        Command::List { kind, json } => match kind {
            ListKind::Tabs => list_tabs(json),
            ListKind::Bookmarks => list_bookmarks(json),
            ListKind::Folders => list_folders(json),
            ListKind::Readlist => list_reading_list(json),
            ListKind::Cloud => list_cloud_tabs(json),
        },
        Command::Close { target, window, tab } => {
            safari_use::close(target.into(), window, tab).context("close failed")
        }
        Command::History { query, json } => search_history(&query, json),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Bookmarklets are not navigable, so keep them out of listings.
fn is_bookmarklet(bookmark: &bookmarks::Bookmark) -> bool {
    bookmark.url.starts_with("javascript:")
}

fn list_tabs(json: bool) -> anyhow::Result<()> {
    let windows = safari_use::windows().context("error communicating with Safari")?;

    if json {
        return print_json(&windows);
    }

    for window in &windows {
        println!("Window {}", window.index);
        for tab in &window.tabs {
            let marker = if tab.index == window.active_tab { '*' } else { ' ' };
            println!("  [{:2}]{} {}", tab.index, marker, tab.title);
        }
    }
    Ok(())
}

fn list_bookmarks(json: bool) -> anyhow::Result<()> {
    let parser = bookmarks::Parser::load().context("could not read Bookmarks.plist")?;

    if json {
        let output: Vec<&bookmarks::Bookmark> = parser.filter(|bm| !is_bookmarklet(bm));
        return print_json(&output);
    }

    if let Some(bar) = &parser.bookmarks_bar {
        print_folder(bar, 0, true);
    }
    Ok(())
}

fn list_folders(json: bool) -> anyhow::Result<()> {
    let parser = bookmarks::Parser::load().context("could not read Bookmarks.plist")?;

    if json {
        return print_json(&parser.folders());
    }

    if let Some(bar) = &parser.bookmarks_bar {
        print_folder(bar, 0, false);
    }
    Ok(())
}

fn print_folder(folder: &bookmarks::Folder, indent: usize, with_bookmarks: bool) {
    println!("{:indent$}{}/", "", folder.title, indent = indent);

    for sub in &folder.folders {
        print_folder(sub, indent + 2, with_bookmarks);
    }

    if with_bookmarks {
        for bookmark in &folder.bookmarks {
            if is_bookmarklet(bookmark) {
                continue;
            }
            println!("{:indent$}{}", "", bookmark.title, indent = indent + 2);
        }
    }
}

fn list_reading_list(json: bool) -> anyhow::Result<()> {
    let parser = bookmarks::Parser::load().context("could not read Bookmarks.plist")?;
    let entries = &parser.reading_list_bookmarks;

    if json {
        return print_json(entries);
    }

    let width = entries.len().to_string().len();
    for (i, bookmark) in entries.iter().enumerate() {
        println!("[{:width$}] {}", i + 1, bookmark.title, width = width);
    }
    Ok(())
}

fn list_cloud_tabs(json: bool) -> anyhow::Result<()> {
    let db = cloud::CloudTabs::open_default().context("could not open CloudTabs.db")?;
    let tabs = db.tabs().context("could not load cloud tabs")?;

    if json {
        return print_json(&tabs);
    }

    let width = tabs.len().to_string().len();
    for (i, tab) in tabs.iter().enumerate() {
        println!("[{:width$}] {} ({})", i + 1, tab.title, tab.device, width = width);
    }
    Ok(())
}

fn search_history(query: &str, json: bool) -> anyhow::Result<()> {
    let db = history::History::open_default().context("could not open History.db")?;
    let entries = db
        .search_limit(query, HISTORY_SEARCH_LIMIT)
        .context("history search failed")?;

    if json {
        return print_json(&entries);
    }

    for (i, entry) in entries.iter().enumerate() {
        println!("[{}/{}] {:?} ({})", i + 1, entries.len(), entry.title, entry.url);
    }
    Ok(())
}
