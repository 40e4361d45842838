//! Subcommand definitions and their execution against a dashboard.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use nebula_core::{
    EXPORT_FILE_NAME, GateError, SearchEngine, SearchTarget, parse_import, resolve_category_icon,
    route_query,
};
use nebula_engine::Dashboard;
use nebula_types::{AppState, Category, CategoryId, Link, LinkId, PendingAction};

/// Wrong-password retries allowed for one gated command.
const MAX_PASSWORD_ATTEMPTS: usize = 3;

#[derive(Parser)]
#[command(name = "nebula", version)]
#[command(about = "Manage a Nebula bookmark dashboard from the terminal")]
pub struct Cli {
    /// Config file (defaults to ~/.nebula/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Password for gated edits; prompted on stdin when omitted
    #[arg(long, global = true)]
    pub password: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show categories and links
    List {
        /// Only links whose title or description contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print where a search box query would navigate
    Search {
        query: String,
        /// google, bing, duckduckgo, baidu, sogou, so360, zhihu, bilibili,
        /// github, stackoverflow, mdn, baike
        #[arg(long)]
        engine: Option<SearchEngine>,
    },
    /// Append a link to a category
    AddLink {
        category: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change fields of an existing link
    EditLink {
        category: String,
        link: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    DeleteLink {
        category: String,
        link: String,
    },
    /// Append an empty category
    AddCategory {
        #[arg(long)]
        title: String,
        #[arg(long)]
        icon: Option<String>,
        /// Explicit id; generated when omitted or already taken
        #[arg(long)]
        id: Option<String>,
    },
    /// Rename a category or change its icon
    EditCategory {
        category: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a category and all of its links
    DeleteCategory {
        category: String,
    },
    /// Move a link to another position within its category
    Move {
        category: String,
        from: usize,
        to: usize,
    },
    /// Write categories as JSON ("-" for stdout)
    Export {
        path: Option<PathBuf>,
    },
    /// Replace all categories with a JSON export
    Import {
        path: PathBuf,
        /// Skip the overwrite confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Restore the built-in dashboard and clear both storage tiers
    Reset,
    /// Set or clear (no argument) the background image URL
    SetBackground {
        url: Option<String>,
    },
    SetLogoText {
        text: String,
    },
    /// Set or clear (no argument) the logo image URL
    SetLogoImage {
        url: Option<String>,
    },
}

impl Commands {
    /// Commands that never touch the model.
    pub fn run_offline(&self) -> Option<Result<()>> {
        match self {
            Self::Search { query, engine } => Some(search(query, engine.unwrap_or_default())),
            _ => None,
        }
    }
}

fn search(query: &str, engine: SearchEngine) -> Result<()> {
    match route_query(query, engine) {
        Some(SearchTarget::Direct(url)) => println!("{url}"),
        Some(SearchTarget::Engine { engine, url }) => println!("{url}  ({engine})"),
        None => bail!("search query is empty"),
    }
    Ok(())
}

/// Execute `command`. The caller flushes persistence afterwards.
pub fn run(dashboard: &mut Dashboard, command: Commands, password: Option<&str>) -> Result<()> {
    let mut confirm = Confirmer::new(password);
    match command {
        Commands::List { filter } => {
            list(dashboard, filter.as_deref().unwrap_or_default());
            Ok(())
        }
        Commands::Search { query, engine } => search(&query, engine.unwrap_or_default()),
        Commands::AddLink {
            category,
            title,
            url,
            icon,
            description,
        } => {
            let category_id = existing_category(dashboard.state(), &category)?;
            let link = Link {
                id: LinkId::new(""),
                title,
                url,
                icon,
                description,
            };
            confirm.gated(
                dashboard,
                PendingAction::SaveLink {
                    category_id,
                    link,
                    is_edit: false,
                },
            )
        }
        Commands::EditLink {
            category,
            link,
            title,
            url,
            icon,
            description,
        } => {
            let category_id = existing_category(dashboard.state(), &category)?;
            let mut edited = dashboard
                .state()
                .category(&category_id)
                .and_then(|c| c.link(&LinkId::new(link.as_str())))
                .cloned()
                .with_context(|| format!("no link '{link}' in category '{category}'"))?;
            if let Some(title) = title {
                edited.title = title;
            }
            if let Some(url) = url {
                edited.url = url;
            }
            if let Some(icon) = icon {
                edited.icon = Some(icon).filter(|s| !s.is_empty());
            }
            if let Some(description) = description {
                edited.description = Some(description).filter(|s| !s.is_empty());
            }
            confirm.gated(
                dashboard,
                PendingAction::SaveLink {
                    category_id,
                    link: edited,
                    is_edit: true,
                },
            )
        }
        Commands::DeleteLink { category, link } => confirm.gated(
            dashboard,
            PendingAction::DeleteLink {
                category_id: category.into(),
                link_id: link.into(),
            },
        ),
        Commands::AddCategory { title, icon, id } => {
            let mut category = Category::new(id.unwrap_or_default(), title);
            category.icon = icon;
            confirm.gated(
                dashboard,
                PendingAction::SaveCategory {
                    category,
                    is_edit: false,
                },
            )
        }
        Commands::EditCategory {
            category,
            title,
            icon,
        } => {
            let category_id = existing_category(dashboard.state(), &category)?;
            let mut edited = dashboard
                .state()
                .category(&category_id)
                .cloned()
                .with_context(|| format!("no category '{category}'"))?;
            if let Some(title) = title {
                edited.title = title;
            }
            if let Some(icon) = icon {
                edited.icon = Some(icon).filter(|s| !s.is_empty());
            }
            confirm.gated(
                dashboard,
                PendingAction::SaveCategory {
                    category: edited,
                    is_edit: true,
                },
            )
        }
        Commands::DeleteCategory { category } => confirm.gated(
            dashboard,
            PendingAction::DeleteCategory {
                category_id: category.into(),
            },
        ),
        Commands::Move { category, from, to } => {
            if dashboard.reorder(&category.into(), from, to) {
                println!("Moved link {from} -> {to}");
            } else {
                println!("Nothing to move");
            }
            Ok(())
        }
        Commands::Export { path } => export(dashboard, path),
        Commands::Import { path, yes } => import(dashboard, &path, yes),
        Commands::Reset => confirm.gated(dashboard, PendingAction::Reset),
        Commands::SetBackground { url } => {
            report_setting(dashboard.set_background_image(url), "Background image");
            Ok(())
        }
        Commands::SetLogoText { text } => {
            report_setting(dashboard.set_logo_text(text), "Logo text");
            Ok(())
        }
        Commands::SetLogoImage { url } => {
            report_setting(dashboard.set_logo_image(url), "Logo image");
            Ok(())
        }
    }
}

fn report_setting(changed: bool, what: &str) {
    if changed {
        println!("{what} updated");
    } else {
        println!("{what} unchanged");
    }
}

fn existing_category(state: &AppState, id: &str) -> Result<CategoryId> {
    let id = CategoryId::new(id);
    if state.category(&id).is_none() {
        bail!("no category '{id}'");
    }
    Ok(id)
}

fn list(dashboard: &Dashboard, filter: &str) {
    let state = dashboard.state();
    println!("{}", state.logo_text);
    let categories = dashboard.filtered(filter);
    if categories.is_empty() {
        println!("No links match \"{filter}\"");
        return;
    }
    for category in &categories {
        println!(
            "\n[{}] {} ({}, {} links)",
            category.id,
            category.title,
            resolve_category_icon(category.icon.as_deref()),
            category.links.len()
        );
        for (index, link) in category.links.iter().enumerate() {
            print!("  {index:>2}. {}  {}  <{}>", link.id, link.title, link.url);
            if let Some(description) = link.description.as_deref() {
                print!("  {description}");
            }
            println!();
        }
    }
}

fn export(dashboard: &Dashboard, path: Option<PathBuf>) -> Result<()> {
    let json = dashboard.export().context("serializing categories")?;
    let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
    if path.as_os_str() == "-" {
        println!("{json}");
        return Ok(());
    }
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("Exported {} categories to {}", dashboard.state().categories.len(), path.display());
    Ok(())
}

fn import(dashboard: &mut Dashboard, path: &Path, yes: bool) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let plan = parse_import(&text)?;
    let count = plan.count();
    let applied = dashboard.import(plan, |prompt| yes || ask_yes_no(prompt));
    if applied {
        println!("Imported {count} categories");
    } else {
        println!("Import cancelled");
    }
    Ok(())
}

fn ask_yes_no(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    read_line().is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Supplies passwords: the `--password` value first, then stdin prompts.
struct Confirmer<'a> {
    flag: Option<&'a str>,
}

impl<'a> Confirmer<'a> {
    fn new(flag: Option<&'a str>) -> Self {
        Self { flag }
    }

    fn next_password(&mut self) -> Option<String> {
        if let Some(password) = self.flag.take() {
            return Some(password.to_string());
        }
        eprint!("Password: ");
        let _ = io::stderr().flush();
        read_line()
    }

    fn gated(&mut self, dashboard: &mut Dashboard, action: PendingAction) -> Result<()> {
        dashboard.request(action);
        if let Some(prompt) = dashboard.prompt() {
            eprintln!("{prompt}");
        }
        let action = confirm_pending(dashboard, || self.next_password())?;
        println!("Done: {}", action.describe());
        Ok(())
    }
}

/// Confirm the pending action, asking `next_password` up to
/// [`MAX_PASSWORD_ATTEMPTS`] times. Any failure leaves nothing pending.
fn confirm_pending(
    dashboard: &mut Dashboard,
    mut next_password: impl FnMut() -> Option<String>,
) -> Result<PendingAction> {
    for attempt in 1..=MAX_PASSWORD_ATTEMPTS {
        let Some(password) = next_password() else {
            dashboard.cancel();
            bail!("no password given; nothing changed");
        };
        match dashboard.confirm(&password) {
            Ok(action) => return Ok(action),
            Err(GateError::Authorization) if attempt < MAX_PASSWORD_ATTEMPTS => {
                eprintln!("{}", GateError::Authorization);
            }
            Err(GateError::Authorization) => break,
            Err(err) => {
                dashboard.cancel();
                return Err(err.into());
            }
        }
    }
    dashboard.cancel();
    bail!("too many wrong passwords; nothing changed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use nebula_engine::PersistenceCoordinator;
    use nebula_storage::{MemoryCache, MemoryStore};
    use nebula_types::Secret;

    fn dashboard() -> Dashboard {
        let persistence = PersistenceCoordinator::spawn(
            Arc::new(MemoryStore::default()),
            Arc::new(MemoryCache::default()),
            Duration::from_millis(10),
        );
        Dashboard::new(AppState::default(), Secret::new("hunter2"), persistence)
    }

    fn passwords(list: &[&str]) -> impl FnMut() -> Option<String> {
        let mut iter = list.iter().map(ToString::to_string).collect::<Vec<_>>().into_iter();
        move || iter.next()
    }

    #[tokio::test]
    async fn third_wrong_password_reports_exhaustion() {
        let mut dashboard = dashboard();
        dashboard.request(PendingAction::Reset);

        let err = confirm_pending(&mut dashboard, passwords(&["a", "b", "c", "hunter2"]))
            .unwrap_err();

        assert!(err.to_string().contains("too many wrong passwords"), "{err}");
        assert!(dashboard.pending().is_none());
    }

    #[tokio::test]
    async fn later_attempt_can_succeed() {
        let mut dashboard = dashboard();
        dashboard.request(PendingAction::Reset);

        let action = confirm_pending(&mut dashboard, passwords(&["a", "hunter2"])).unwrap();

        assert_eq!(action, PendingAction::Reset);
        assert!(dashboard.pending().is_none());
    }

    #[tokio::test]
    async fn missing_password_cancels() {
        let mut dashboard = dashboard();
        dashboard.request(PendingAction::Reset);

        let err = confirm_pending(&mut dashboard, passwords(&[])).unwrap_err();

        assert!(err.to_string().contains("no password given"), "{err}");
        assert!(dashboard.pending().is_none());
    }
}
