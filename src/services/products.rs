use crate::api::{parse_payload, Client, Method};
use crate::domain::models::{Product, ProductInput, ProductPatch, ProductTemplate};
use serde_json::json;

pub fn recent(client: &Client) -> anyhow::Result<Vec<Product>> {
    let v = client.request(Method::Get, "/product", &[], None, "could not load products")?;
    parse_payload(v, "product list")
}

pub fn details(client: &Client, id: i64) -> anyhow::Result<Product> {
    let v = client.request(
        Method::Get,
        &format!("/product/{id}"),
        &[],
        None,
        "could not load the product",
    )?;
    parse_payload(v, "product")
}

pub fn create(client: &Client, input: &ProductInput) -> anyhow::Result<Product> {
    let body = serde_json::to_value(input)?;
    let v = client.request(
        Method::Post,
        "/product",
        &[],
        Some(&body),
        "could not create the product",
    )?;
    parse_payload(v, "product")
}

pub fn update(client: &Client, id: i64, patch: &ProductPatch) -> anyhow::Result<Product> {
    let body = serde_json::to_value(patch)?;
    let v = client.request(
        Method::Put,
        &format!("/product/{id}"),
        &[],
        Some(&body),
        "could not update the product",
    )?;
    parse_payload(v, "product")
}

pub fn adjust_quantity(client: &Client, id: i64, quantity: i64) -> anyhow::Result<Product> {
    let body = json!({ "quantity": quantity });
    let v = client.request(
        Method::Patch,
        &format!("/product/{id}/quantity"),
        &[],
        Some(&body),
        "could not adjust the quantity",
    )?;
    parse_payload(v, "product")
}

pub fn delete(client: &Client, id: i64) -> anyhow::Result<()> {
    client.request(
        Method::Delete,
        &format!("/product/{id}"),
        &[],
        None,
        "could not delete the product",
    )?;
    Ok(())
}

pub fn search_templates(client: &Client, name: &str) -> anyhow::Result<Vec<ProductTemplate>> {
    let v = client.request(
        Method::Get,
        "/product/template",
        &[("name", name)],
        None,
        "could not search templates",
    )?;
    parse_payload(v, "template list")
}

pub fn template_by_ean(client: &Client, ean: &str) -> anyhow::Result<ProductTemplate> {
    let v = client.request(
        Method::Get,
        &format!("/product/template/ean/{ean}"),
        &[],
        None,
        "could not look up the template",
    )?;
    parse_payload(v, "template")
}
