use anyhow::{Result, bail};
use clap::Subcommand;
use serde_json::json;

use vaultdesk_core::account::{AccountFilters, AccountRecord, AccountUpdate, BatchOutcome, TagMode};

use super::Context;

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List one page of accounts
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        source: Option<String>,
        /// Tag id; repeat for several
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        membership: Option<String>,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Defaults to `default_page_size` from config.toml
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,
    },
    /// Show one account
    Show { id: String },
    /// Print the decrypted password
    Password { id: String },
    /// Print the TOTP secret
    Totp { id: String },
    /// Change fields of one account
    Edit {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        browser: Option<String>,
        #[arg(long)]
        membership: Option<String>,
    },
    /// Delete an account
    Delete {
        id: String,
        /// Remove permanently instead of soft-deleting
        #[arg(long)]
        hard: bool,
    },
    /// Delete several accounts at once
    DeleteMany {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        hard: bool,
    },
    /// Add, remove or replace tags on several accounts
    Tag {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Tag id; repeat for several
        #[arg(long = "tag", required = true)]
        tags: Vec<String>,
        /// add, remove or set
        #[arg(long, default_value = "add")]
        mode: TagMode,
    },
}

pub async fn run(ctx: &Context, action: AccountsAction) -> Result<()> {
    let store = &ctx.vault.accounts;

    match action {
        AccountsAction::List {
            search,
            source,
            tags,
            membership,
            page,
            ..
        } => {
            let filters = AccountFilters {
                search,
                source,
                tag_ids: (!tags.is_empty()).then_some(tags),
                gpt_membership: membership,
            };
            let listing = store.apply_query(filters, page).await?;

            ctx.emit(
                json!({
                    "items": listing.items,
                    "total": listing.total,
                    "page": store.page(),
                    "page_size": store.page_size(),
                    "total_pages": listing.total_pages,
                }),
                || {
                    let mut lines: Vec<String> = listing.items.iter().map(summary_line).collect();
                    let scope = if store.filters().is_empty() {
                        "accounts"
                    } else {
                        "matching accounts"
                    };
                    lines.push(format!(
                        "Page {}/{} ({} {scope})",
                        store.page(),
                        listing.total_pages,
                        listing.total
                    ));
                    lines.join("\n")
                },
            )
        }
        AccountsAction::Show { id } => {
            let record = store.load_current_account(&id).await?;
            ctx.emit(json!(record), || detail_lines(&record))
        }
        AccountsAction::Password { id } => {
            let password = store.get_password(&id).await?;
            ctx.emit(json!({ "password": password }), || {
                password.clone().unwrap_or_else(|| "(no password stored)".to_string())
            })
        }
        AccountsAction::Totp { id } => {
            let secret = store.get_totp(&id).await?;
            ctx.emit(json!({ "totp_secret": secret }), || {
                secret.clone().unwrap_or_else(|| "(no TOTP secret stored)".to_string())
            })
        }
        AccountsAction::Edit {
            id,
            email,
            note,
            source,
            browser,
            membership,
        } => {
            let data = AccountUpdate {
                email,
                note,
                source,
                browser,
                gpt_membership: membership,
                ..AccountUpdate::default()
            };
            if data.is_empty() {
                bail!("Nothing to change; pass at least one field flag");
            }
            let record = store.update_account(&id, &data).await?;
            ctx.emit(json!(record), || detail_lines(&record))
        }
        AccountsAction::DeleteMany { ids, hard } => {
            let outcome = store.batch_delete(&ids, hard).await?;
            ctx.emit(json!({ "hard": hard, "outcome": outcome }), || {
                batch_summary("Deleted", &outcome)
            })
        }
        AccountsAction::Tag { ids, tags, mode } => {
            let outcome = store.batch_update_tags(&ids, &tags, mode).await?;
            ctx.emit(json!({ "mode": mode, "outcome": outcome }), || {
                batch_summary("Retagged", &outcome)
            })
        }
        AccountsAction::Delete { id, hard } => {
            if hard {
                store.hard_delete_account(&id).await?;
            } else {
                store.delete_account(&id).await?;
            }
            ctx.emit(json!({ "deleted": id, "hard": hard }), || {
                format!("Deleted {id}. {} accounts remain.", store.total())
            })
        }
    }
}

pub async fn sources(ctx: &Context) -> Result<()> {
    let sources = ctx.vault.accounts.fetch_sources().await?;
    ctx.emit(json!(sources), || sources.join("\n"))
}

pub async fn stats(ctx: &Context) -> Result<()> {
    let stats = ctx.vault.accounts.fetch_stats().await?;
    ctx.emit(json!(stats), || {
        let mut lines = vec![
            format!("Total:           {}", stats.total),
            format!("With membership: {}", stats.with_membership),
        ];
        lines.extend(
            stats
                .by_source
                .iter()
                .map(|(source, count)| format!("  {source}: {count}")),
        );
        lines.join("\n")
    })
}

/// Partial failures are reported, not raised.
fn batch_summary(verb: &str, outcome: &BatchOutcome) -> String {
    if !outcome.has_failures() {
        format!("{verb} {} accounts.", outcome.succeeded)
    } else if outcome.is_partial_failure() {
        format!("{verb} {} accounts; {} failed.", outcome.succeeded, outcome.failed)
    } else {
        format!("{verb} no accounts; all {} failed.", outcome.failed)
    }
}

fn summary_line(account: &AccountRecord) -> String {
    let mut line = format!("{}  {}", account.id, account.email);
    if let Some(source) = &account.source {
        line.push_str(&format!("  [{source}]"));
    }
    if !account.tags.is_empty() {
        let names: Vec<&str> = account.tags.iter().map(|tag| tag.name.as_str()).collect();
        line.push_str(&format!("  #{}", names.join(" #")));
    }
    line
}

fn detail_lines(account: &AccountRecord) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        format!("Id:             {}", account.id),
        format!("Email:          {}", account.email),
        format!("Source:         {}", optional(&account.source)),
        format!("Browser:        {}", optional(&account.browser)),
        format!("Membership:     {}", optional(&account.gpt_membership)),
        format!("Family group:   {}", optional(&account.family_group)),
        format!("Recovery email: {}", optional(&account.recovery_email)),
        format!("Note:           {}", optional(&account.note)),
        format!("Password:       {}", if account.has_password { "yes" } else { "no" }),
        format!("TOTP:           {}", if account.has_totp { "yes" } else { "no" }),
        format!("Updated:        {}", account.updated_at),
    ];
    lines.extend(
        account
            .custom_fields
            .iter()
            .map(|(key, value)| format!("{key}: {value}")),
    );
    lines.join("\n")
}
