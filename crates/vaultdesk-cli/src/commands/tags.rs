use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use vaultdesk_core::tag::{DEFAULT_TAG_COLOR, Tag, TagCreate};

use super::Context;

#[derive(Subcommand)]
pub enum TagsAction {
    /// List all tags
    List,
    /// Create a tag
    Create {
        name: String,
        #[arg(long, default_value = DEFAULT_TAG_COLOR)]
        color: String,
    },
    /// Delete a tag
    Delete { id: String },
}

pub async fn run(ctx: &Context, action: TagsAction) -> Result<()> {
    let tags = ctx.vault.accounts.tag_store();

    match action {
        TagsAction::List => {
            let list = tags.fetch_tags().await?;
            ctx.emit(json!(list), || {
                if list.is_empty() {
                    return "No tags.".to_string();
                }
                list.iter().map(tag_line).collect::<Vec<_>>().join("\n")
            })
        }
        TagsAction::Create { name, color } => {
            let tag = tags.create_tag(&TagCreate::new(name).with_color(color)).await?;
            ctx.emit(json!(tag), || format!("Created {}", tag_line(&tag)))
        }
        TagsAction::Delete { id } => {
            tags.delete_tag(&id).await?;
            ctx.emit(json!({ "deleted": id }), || format!("Deleted tag {id}."))
        }
    }
}

fn tag_line(tag: &Tag) -> String {
    match tag.account_count {
        Some(count) => format!("{}  {} ({})  {count} accounts", tag.id, tag.name, tag.color),
        None => format!("{}  {} ({})", tag.id, tag.name, tag.color),
    }
}
