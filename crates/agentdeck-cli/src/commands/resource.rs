use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use serde_json::json;

use crate::cli::Commands;
use crate::commands::utils::{format_timestamp, load_content, preview_text};
use crate::output::{OutputFormat, json::print_json, table};
use agentdeck_core::{AppCore, Resource, ResourceStore, ResourceType, ResourceUpdate};

pub async fn run(core: &AppCore, command: Commands, format: OutputFormat) -> Result<()> {
    let store = core.store.as_ref();
    match command {
        Commands::List { kind, search } => list_resources(store, kind, search, format),
        Commands::Show { id } => show_resource(store, &id, format),
        Commands::Create { kind, name } => create_resource(store, kind, &name, format).await,
        Commands::Update {
            id,
            name,
            content,
            file,
        } => {
            let content = load_content(file.as_deref(), content)?;
            if name.is_none() && content.is_none() {
                bail!("Nothing to update; pass --name, --content or --file");
            }
            update_resource(store, &id, ResourceUpdate { name, content }, format).await
        }
        Commands::Delete { id } => delete_resource(store, &id, format).await,
        Commands::Folders { search } => list_folders(store, search, format),
        Commands::Completions { .. } => Ok(()),
    }
}

fn list_resources(
    store: &ResourceStore,
    kind: Option<ResourceType>,
    search: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    store.filter(search.unwrap_or_default());
    let resources = match kind {
        Some(kind) => store.visible_by_type(kind),
        None => store.visible(),
    };

    if format.is_json() {
        return print_json(&resources);
    }

    if resources.is_empty() {
        println!("No resources found.");
        return Ok(());
    }

    let mut table = table::new_table(["ID", "Type", "Name", "Updated"]);
    for resource in resources {
        table.add_row(vec![
            Cell::new(resource.id),
            Cell::new(resource.kind.label()),
            Cell::new(preview_text(&resource.name, 40)),
            Cell::new(format_timestamp(resource.updated_at)),
        ]);
    }
    table::print_table(table)
}

fn show_resource(store: &ResourceStore, id: &str, format: OutputFormat) -> Result<()> {
    let resource = store
        .select(Some(id))
        .ok_or_else(|| anyhow!("Resource not found: {}", id))?;

    if format.is_json() {
        return print_json(&resource);
    }

    print_details(&resource);
    println!("\n{}", resource.content);
    Ok(())
}

async fn create_resource(
    store: &ResourceStore,
    kind: ResourceType,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let resource = store.create(kind, name).await?;

    if format.is_json() {
        return print_json(&resource);
    }

    print_notification(store);
    println!("ID: {}", resource.id);
    Ok(())
}

async fn update_resource(
    store: &ResourceStore,
    id: &str,
    update: ResourceUpdate,
    format: OutputFormat,
) -> Result<()> {
    let resource = store.update(id, update).await?;

    if format.is_json() {
        return print_json(&resource);
    }

    print_notification(store);
    print_details(&resource);
    Ok(())
}

async fn delete_resource(store: &ResourceStore, id: &str, format: OutputFormat) -> Result<()> {
    store.delete(id).await?;

    if format.is_json() {
        return print_json(&json!({ "deleted": true, "id": id }));
    }

    print_notification(store);
    Ok(())
}

fn list_folders(store: &ResourceStore, search: Option<String>, format: OutputFormat) -> Result<()> {
    store.filter(search.unwrap_or_default());
    let counts = store.folder_counts();

    if format.is_json() {
        let folders: Vec<_> = counts
            .iter()
            .map(|(kind, count)| json!({ "type": kind, "label": kind.label(), "count": count }))
            .collect();
        return print_json(&json!({ "folders": folders }));
    }

    let mut table = table::new_table(["Folder", "Type", "Count"]);
    for (kind, count) in counts {
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(kind.as_str()),
            Cell::new(count),
        ]);
    }
    table::print_table(table)
}

fn print_details(resource: &Resource) {
    println!("ID:      {}", resource.id);
    println!("Name:    {}", resource.name);
    println!("Type:    {}", resource.kind.label());
    println!("Folder:  {}", resource.folder_path);
    println!("Created: {}", format_timestamp(resource.created_at));
    println!("Updated: {}", format_timestamp(resource.updated_at));
}

fn print_notification(store: &ResourceStore) {
    if let Some(notification) = store.notifier().current() {
        println!("{}", notification.message);
    }
}
