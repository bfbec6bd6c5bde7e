use anyhow::{Context, Result, bail, ensure};
use itertools::Itertools;
use log::warn;

use crate::entities::{Container, Instance, Item, Orientation};
use crate::io::ext_repr::{ExtDimensions, ExtItem, ExtJob};

/// Imports the container and items of a job into the library.
pub fn import(ext_job: &ExtJob) -> Result<Instance> {
    let container = import_container(&ext_job.container).context("invalid container")?;

    ensure!(!ext_job.items.is_empty(), "no items provided");

    let items = ext_job
        .items
        .iter()
        .map(|ext_item| {
            import_item(ext_item).with_context(|| format!("invalid item with id {}", ext_item.id))
        })
        .collect::<Result<Vec<Item>>>()?;

    let duplicate_ids = items.iter().map(|item| item.id).duplicates().collect_vec();
    if !duplicate_ids.is_empty() {
        bail!("item IDs should be unique, duplicates: {duplicate_ids:?}");
    }

    Instance::new(container, items)
}

pub fn import_container(ext_dims: &ExtDimensions) -> Result<Container> {
    let Orientation { w, h, d } = import_dimensions(ext_dims)?;
    Container::new(w, h, d)
}

pub fn import_item(ext_item: &ExtItem) -> Result<Item> {
    let dims = import_dimensions(&ext_item.dimensions)?;
    Item::new(ext_item.id, dims)
}

fn import_dimensions(ext_dims: &ExtDimensions) -> Result<Orientation> {
    Ok(Orientation::new(
        import_length(ext_dims.width, "width")?,
        import_length(ext_dims.height, "height")?,
        import_length(ext_dims.depth, "depth")?,
    ))
}

/// Converts a length to whole units, truncating any fractional part.
fn import_length(value: f64, name: &str) -> Result<usize> {
    ensure!(value.is_finite(), "{name} is not a finite number: {value}");
    let truncated = value.trunc();
    if truncated != value {
        warn!("{name} {value} is not a whole number, truncated to {truncated}");
    }
    ensure!(truncated >= 1.0, "{name} should be a positive integer, got {value}");
    ensure!(truncated < usize::MAX as f64, "{name} is too large: {value}");
    Ok(truncated as usize)
}
