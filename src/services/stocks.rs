use crate::api::{parse_payload, Client, Method};
use crate::domain::models::{Stock, StockInput, StockPatch};

pub fn all(client: &Client) -> anyhow::Result<Vec<Stock>> {
    let v = client.request(Method::Get, "/stock", &[], None, "could not load stocks")?;
    parse_payload(v, "stock list")
}

pub fn get(client: &Client, id: i64) -> anyhow::Result<Stock> {
    let v = client.request(
        Method::Get,
        &format!("/stock/{id}"),
        &[],
        None,
        "could not load the stock",
    )?;
    parse_payload(v, "stock")
}

pub fn create(client: &Client, input: &StockInput) -> anyhow::Result<Stock> {
    let body = serde_json::to_value(input)?;
    let v = client.request(
        Method::Post,
        "/stock",
        &[],
        Some(&body),
        "could not create the stock",
    )?;
    parse_payload(v, "stock")
}

pub fn update(client: &Client, id: i64, patch: &StockPatch) -> anyhow::Result<Stock> {
    let body = serde_json::to_value(patch)?;
    let v = client.request(
        Method::Put,
        &format!("/stock/{id}"),
        &[],
        Some(&body),
        "could not update the stock",
    )?;
    parse_payload(v, "stock")
}

pub fn delete(client: &Client, id: i64) -> anyhow::Result<()> {
    client.request(
        Method::Delete,
        &format!("/stock/{id}"),
        &[],
        None,
        "could not delete the stock",
    )?;
    Ok(())
}
