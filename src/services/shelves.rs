use crate::api::{parse_payload, Client, Method};
use crate::domain::models::{Shelf, ShelfInput, ShelfLayout, ShelfPatch};
use crate::services::grid;

pub fn all(client: &Client) -> anyhow::Result<Vec<Shelf>> {
    let v = client.request(Method::Get, "/shelf", &[], None, "could not load shelves")?;
    parse_payload(v, "shelf list")
}

/// Single attempt, fail visible: a layout that cannot be fetched or that
/// violates the grid invariants is an error for the caller to surface.
pub fn layout(client: &Client, shelf_id: i64) -> anyhow::Result<ShelfLayout> {
    let v = client.request(
        Method::Get,
        &format!("/shelf/{shelf_id}"),
        &[],
        None,
        "could not load the shelf",
    )?;
    let layout: ShelfLayout = parse_payload(v, "shelf layout")?;
    grid::validate(&layout)?;
    Ok(layout)
}

pub fn create(client: &Client, input: &ShelfInput) -> anyhow::Result<Shelf> {
    let body = serde_json::to_value(input)?;
    let v = client.request(
        Method::Post,
        "/shelf",
        &[],
        Some(&body),
        "could not create the shelf",
    )?;
    parse_payload(v, "shelf")
}

pub fn update(client: &Client, id: i64, patch: &ShelfPatch) -> anyhow::Result<Shelf> {
    let body = serde_json::to_value(patch)?;
    let v = client.request(
        Method::Put,
        &format!("/shelf/{id}"),
        &[],
        Some(&body),
        "could not update the shelf",
    )?;
    parse_payload(v, "shelf")
}

pub fn delete(client: &Client, id: i64) -> anyhow::Result<()> {
    client.request(
        Method::Delete,
        &format!("/shelf/{id}"),
        &[],
        None,
        "could not delete the shelf",
    )?;
    Ok(())
}
