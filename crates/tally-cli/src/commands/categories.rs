//! Category command implementations

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::{NewCategory, TransactionType};

pub fn cmd_categories_list(db: &Database, user_id: i64) -> Result<()> {
    let categories = db.list_categories(user_id)?;

    if categories.is_empty() {
        println!("No categories found. Seed the defaults with:");
        println!("  tally init");
        return Ok(());
    }

    println!();
    println!("🗂️  Categories");
    println!("   ─────────────────────────────");

    let mut current_type: Option<TransactionType> = None;
    for category in categories {
        if current_type != Some(category.category_type) {
            println!();
            println!("   {}", category.category_type);
            current_type = Some(category.category_type);
        }
        let owner = if category.user_id.is_some() { "" } else { " (default)" };
        println!(
            "   [{}] {} {}{}",
            category.id,
            category.icon.as_deref().unwrap_or("  "),
            category.name,
            owner
        );
    }

    Ok(())
}

pub fn cmd_categories_add(
    db: &Database,
    user_id: i64,
    name: &str,
    category_type: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let category_type: TransactionType = category_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let id = db
        .insert_category(&NewCategory {
            user_id,
            name: name.to_string(),
            icon: icon.map(String::from),
            color: color.map(String::from),
            category_type,
        })
        .context("Failed to create category")?;

    println!("✅ Created category '{}' (id {})", name, id);

    Ok(())
}

pub fn cmd_categories_delete(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_category(user_id, id)? {
        anyhow::bail!("Category {} not found (default categories cannot be deleted)", id);
    }

    println!("🗑️  Deleted category {}", id);
    println!("   Its transactions are now reported as Uncategorized.");

    Ok(())
}
