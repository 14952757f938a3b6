//! File-backed API backend.
//!
//! When the `--api` source is a directory, requests are served from JSON
//! collections inside it (`users.json`, `sessions.json`, `stocks.json`,
//! `shelves.json`, `products.json`, `templates.json`). Routes, payloads,
//! and error messages mirror the remote REST contract, so the client code
//! and the integration tests see the same behavior either way.

use super::Method;
use crate::domain::errors::AppError;
use crate::domain::models::{
    Product, ProductInput, ProductPatch, ProductTemplate, Shelf, ShelfInput, ShelfItem,
    ShelfLayout, ShelfPatch, Stock, StockInput, StockPatch,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    id: i64,
    name: String,
    email: String,
    password_sha256: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    token: String,
    user_id: i64,
}

/// Shelves and products live inside a stock; the extra field scopes them
/// the way the `X-Stock-ID` header scopes remote requests.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StoredShelf {
    #[serde(flatten)]
    shelf: Shelf,
    stock_id: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StoredProduct {
    #[serde(flatten)]
    product: Product,
    stock_id: i64,
}

pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn api(msg: impl Into<String>) -> anyhow::Error {
    AppError::api(msg).into()
}

fn load<T: DeserializeOwned>(dir: &Path, file: &str) -> anyhow::Result<Vec<T>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn save<T: Serialize>(dir: &Path, file: &str, items: &[T]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(file), serde_json::to_string_pretty(items)?)?;
    Ok(())
}

fn required(body: Option<&Value>) -> anyhow::Result<&Value> {
    body.ok_or_else(|| api("missing request body"))
}

fn str_field<'a>(body: &'a Value, name: &str) -> anyhow::Result<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| api(format!("missing field: {name}")))
}

fn parse_id(raw: &str) -> anyhow::Result<i64> {
    raw.parse::<i64>().map_err(|_| api(format!("invalid id: {raw}")))
}

pub fn handle(
    dir: &Path,
    method: Method,
    path: &str,
    query: &[(&str, &str)],
    body: Option<&Value>,
    token: Option<&str>,
    stock_id: Option<i64>,
) -> anyhow::Result<Value> {
    if !dir.is_dir() {
        return Err(api(format!("api directory not found: {}", dir.display())));
    }
    let segs: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match (method, segs.as_slice()) {
        (Method::Post, ["login"]) => login(dir, required(body)?),
        (Method::Post, ["register"]) => register(dir, required(body)?),
        _ => {
            authorize(dir, token)?;
            routed(dir, method, &segs, query, body, stock_id)
        }
    }
}

fn routed(
    dir: &Path,
    method: Method,
    segs: &[&str],
    query: &[(&str, &str)],
    body: Option<&Value>,
    stock_id: Option<i64>,
) -> anyhow::Result<Value> {
    match (method, segs) {
        (Method::Get, ["stock"]) => Ok(serde_json::to_value(load::<Stock>(dir, "stocks.json")?)?),
        (Method::Post, ["stock"]) => create_stock(dir, required(body)?),
        (Method::Get, ["stock", id]) => {
            let id = parse_id(id)?;
            let stocks: Vec<Stock> = load(dir, "stocks.json")?;
            let stock = stocks
                .into_iter()
                .find(|s| s.id == id)
                .ok_or_else(|| api("stock not found"))?;
            Ok(serde_json::to_value(stock)?)
        }
        (Method::Put, ["stock", id]) => update_stock(dir, parse_id(id)?, required(body)?),
        (Method::Delete, ["stock", id]) => {
            let id = parse_id(id)?;
            let mut stocks: Vec<Stock> = load(dir, "stocks.json")?;
            let before = stocks.len();
            stocks.retain(|s| s.id != id);
            if stocks.len() == before {
                return Err(api("stock not found"));
            }
            save(dir, "stocks.json", &stocks)?;
            Ok(json!({ "deleted": id }))
        }

        (Method::Get, ["shelf"]) => {
            let sid = scoped_stock(dir, stock_id)?;
            let shelves: Vec<StoredShelf> = load(dir, "shelves.json")?;
            let out: Vec<Shelf> = shelves
                .into_iter()
                .filter(|s| s.stock_id == sid)
                .map(|s| s.shelf)
                .collect();
            Ok(serde_json::to_value(out)?)
        }
        (Method::Post, ["shelf"]) => create_shelf(dir, scoped_stock(dir, stock_id)?, required(body)?),
        (Method::Get, ["shelf", id]) => shelf_layout(dir, scoped_stock(dir, stock_id)?, parse_id(id)?),
        (Method::Put, ["shelf", id]) => {
            update_shelf(dir, scoped_stock(dir, stock_id)?, parse_id(id)?, required(body)?)
        }
        (Method::Delete, ["shelf", id]) => {
            delete_shelf(dir, scoped_stock(dir, stock_id)?, parse_id(id)?)
        }

        (Method::Get, ["product", "template"]) => {
            scoped_stock(dir, stock_id)?;
            let q = query
                .iter()
                .find(|(k, _)| *k == "name")
                .map(|(_, v)| v.to_ascii_lowercase())
                .unwrap_or_default();
            let templates: Vec<ProductTemplate> = load(dir, "templates.json")?;
            let out: Vec<ProductTemplate> = templates
                .into_iter()
                .filter(|t| t.name.to_ascii_lowercase().contains(&q))
                .collect();
            Ok(serde_json::to_value(out)?)
        }
        (Method::Get, ["product", "template", "ean", ean]) => {
            scoped_stock(dir, stock_id)?;
            let templates: Vec<ProductTemplate> = load(dir, "templates.json")?;
            let template = templates
                .into_iter()
                .find(|t| t.ean == *ean)
                .ok_or_else(|| api("template not found"))?;
            Ok(serde_json::to_value(template)?)
        }

        (Method::Get, ["product"]) => {
            let sid = scoped_stock(dir, stock_id)?;
            let products: Vec<StoredProduct> = load(dir, "products.json")?;
            let mut out: Vec<Product> = products
                .into_iter()
                .filter(|p| p.stock_id == sid)
                .map(|p| p.product)
                .collect();
            out.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(serde_json::to_value(out)?)
        }
        (Method::Post, ["product"]) => {
            create_product(dir, scoped_stock(dir, stock_id)?, required(body)?)
        }
        (Method::Get, ["product", id]) => {
            let sid = scoped_stock(dir, stock_id)?;
            let id = parse_id(id)?;
            let products: Vec<StoredProduct> = load(dir, "products.json")?;
            let product = products
                .into_iter()
                .find(|p| p.stock_id == sid && p.product.id == id)
                .map(|p| p.product)
                .ok_or_else(|| api("product not found"))?;
            Ok(serde_json::to_value(product)?)
        }
        (Method::Put, ["product", id]) => {
            update_product(dir, scoped_stock(dir, stock_id)?, parse_id(id)?, required(body)?)
        }
        (Method::Patch, ["product", id, "quantity"]) => {
            adjust_quantity(dir, scoped_stock(dir, stock_id)?, parse_id(id)?, required(body)?)
        }
        (Method::Delete, ["product", id]) => {
            let sid = scoped_stock(dir, stock_id)?;
            let id = parse_id(id)?;
            let mut products: Vec<StoredProduct> = load(dir, "products.json")?;
            let before = products.len();
            products.retain(|p| !(p.stock_id == sid && p.product.id == id));
            if products.len() == before {
                return Err(api("product not found"));
            }
            save(dir, "products.json", &products)?;
            Ok(json!({ "deleted": id }))
        }

        _ => Err(api(format!("no such route: {}", segs.join("/")))),
    }
}

fn authorize(dir: &Path, token: Option<&str>) -> anyhow::Result<()> {
    let token = token.ok_or_else(|| api("missing bearer token"))?;
    let sessions: Vec<StoredSession> = load(dir, "sessions.json")?;
    if !sessions.iter().any(|s| s.token == token) {
        return Err(api("invalid or expired session token"));
    }
    Ok(())
}

fn scoped_stock(dir: &Path, stock_id: Option<i64>) -> anyhow::Result<i64> {
    let sid = stock_id.ok_or_else(|| api("missing X-Stock-ID header"))?;
    let stocks: Vec<Stock> = load(dir, "stocks.json")?;
    if !stocks.iter().any(|s| s.id == sid) {
        return Err(api("stock not found"));
    }
    Ok(sid)
}

fn login(dir: &Path, body: &Value) -> anyhow::Result<Value> {
    let email = str_field(body, "email")?;
    let password = str_field(body, "password")?;
    let users: Vec<StoredUser> = load(dir, "users.json")?;
    let digest = password_digest(password);
    let user = users
        .iter()
        .find(|u| u.email == email && u.password_sha256 == digest)
        .ok_or_else(|| api("invalid email or password"))?;
    let mut sessions: Vec<StoredSession> = load(dir, "sessions.json")?;
    let seed = format!("{}:{}:{}", user.email, digest, sessions.len());
    let token = hex::encode(Sha256::digest(seed.as_bytes()));
    sessions.push(StoredSession {
        token: token.clone(),
        user_id: user.id,
    });
    save(dir, "sessions.json", &sessions)?;
    Ok(json!({ "token": token }))
}

fn register(dir: &Path, body: &Value) -> anyhow::Result<Value> {
    let name = str_field(body, "name")?;
    let email = str_field(body, "email")?;
    let password = str_field(body, "password")?;
    let mut users: Vec<StoredUser> = load(dir, "users.json")?;
    if users.iter().any(|u| u.email == email) {
        return Err(api("email already registered"));
    }
    let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
    users.push(StoredUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_sha256: password_digest(password),
    });
    save(dir, "users.json", &users)?;
    Ok(json!({ "id": id, "name": name, "email": email }))
}

fn create_stock(dir: &Path, body: &Value) -> anyhow::Result<Value> {
    let input: StockInput =
        serde_json::from_value(body.clone()).map_err(|_| api("invalid stock payload"))?;
    if input.name.trim().is_empty() {
        return Err(api("stock name is required"));
    }
    let mut stocks: Vec<Stock> = load(dir, "stocks.json")?;
    let id = stocks.iter().map(|s| s.id).max().unwrap_or(0) + 1;
    let stock = Stock {
        id,
        name: input.name,
        description: input.description,
    };
    stocks.push(stock.clone());
    save(dir, "stocks.json", &stocks)?;
    Ok(serde_json::to_value(stock)?)
}

fn update_stock(dir: &Path, id: i64, body: &Value) -> anyhow::Result<Value> {
    let patch: StockPatch =
        serde_json::from_value(body.clone()).map_err(|_| api("invalid stock payload"))?;
    let mut stocks: Vec<Stock> = load(dir, "stocks.json")?;
    let stock = stocks
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| api("stock not found"))?;
    if let Some(name) = patch.name {
        stock.name = name;
    }
    if let Some(description) = patch.description {
        stock.description = Some(description);
    }
    let updated = stock.clone();
    save(dir, "stocks.json", &stocks)?;
    Ok(serde_json::to_value(updated)?)
}

fn create_shelf(dir: &Path, sid: i64, body: &Value) -> anyhow::Result<Value> {
    let input: ShelfInput =
        serde_json::from_value(body.clone()).map_err(|_| api("invalid shelf payload"))?;
    if input.name.trim().is_empty() {
        return Err(api("shelf name is required"));
    }
    if input.rows == 0 || input.columns == 0 {
        return Err(api("rows and columns must be greater than zero"));
    }
    let mut shelves: Vec<StoredShelf> = load(dir, "shelves.json")?;
    let id = shelves.iter().map(|s| s.shelf.id).max().unwrap_or(0) + 1;
    let shelf = Shelf {
        id,
        name: input.name,
        rows: input.rows,
        columns: input.columns,
        destination_type: input.destination_type,
        restrictions: input.restrictions,
    };
    shelves.push(StoredShelf {
        shelf: shelf.clone(),
        stock_id: sid,
    });
    save(dir, "shelves.json", &shelves)?;
    Ok(serde_json::to_value(shelf)?)
}

fn shelf_layout(dir: &Path, sid: i64, shelf_id: i64) -> anyhow::Result<Value> {
    let shelves: Vec<StoredShelf> = load(dir, "shelves.json")?;
    let stored = shelves
        .iter()
        .find(|s| s.stock_id == sid && s.shelf.id == shelf_id)
        .ok_or_else(|| api("shelf not found"))?;
    let products: Vec<StoredProduct> = load(dir, "products.json")?;
    let items: Vec<ShelfItem> = products
        .iter()
        .filter(|p| p.stock_id == sid && p.product.shelf_id == shelf_id)
        .map(|p| ShelfItem {
            product_id: p.product.id,
            name: p.product.name.clone(),
            position: p.product.position,
        })
        .collect();
    let layout = ShelfLayout {
        id: stored.shelf.id,
        name: stored.shelf.name.clone(),
        rows: stored.shelf.rows,
        columns: stored.shelf.columns,
        destination_type: stored.shelf.destination_type.clone(),
        restrictions: stored.shelf.restrictions.clone(),
        items,
    };
    Ok(serde_json::to_value(layout)?)
}

fn update_shelf(dir: &Path, sid: i64, shelf_id: i64, body: &Value) -> anyhow::Result<Value> {
    let patch: ShelfPatch =
        serde_json::from_value(body.clone()).map_err(|_| api("invalid shelf payload"))?;
    let mut shelves: Vec<StoredShelf> = load(dir, "shelves.json")?;
    let stored = shelves
        .iter_mut()
        .find(|s| s.stock_id == sid && s.shelf.id == shelf_id)
        .ok_or_else(|| api("shelf not found"))?;
    if let Some(name) = patch.name {
        stored.shelf.name = name;
    }
    if let Some(rows) = patch.rows {
        if rows == 0 {
            return Err(api("rows and columns must be greater than zero"));
        }
        stored.shelf.rows = rows;
    }
    if let Some(columns) = patch.columns {
        if columns == 0 {
            return Err(api("rows and columns must be greater than zero"));
        }
        stored.shelf.columns = columns;
    }
    if let Some(destination_type) = patch.destination_type {
        stored.shelf.destination_type = Some(destination_type);
    }
    if let Some(restrictions) = patch.restrictions {
        stored.shelf.restrictions = Some(restrictions);
    }
    let updated = stored.shelf.clone();
    let products: Vec<StoredProduct> = load(dir, "products.json")?;
    let orphaned = products.iter().any(|p| {
        p.stock_id == sid
            && p.product.shelf_id == shelf_id
            && (p.product.position.row >= updated.rows || p.product.position.column >= updated.columns)
    });
    if orphaned {
        return Err(api("cannot shrink shelf below occupied positions"));
    }
    save(dir, "shelves.json", &shelves)?;
    Ok(serde_json::to_value(updated)?)
}

fn delete_shelf(dir: &Path, sid: i64, shelf_id: i64) -> anyhow::Result<Value> {
    let products: Vec<StoredProduct> = load(dir, "products.json")?;
    if products
        .iter()
        .any(|p| p.stock_id == sid && p.product.shelf_id == shelf_id)
    {
        return Err(api("shelf is not empty"));
    }
    let mut shelves: Vec<StoredShelf> = load(dir, "shelves.json")?;
    let before = shelves.len();
    shelves.retain(|s| !(s.stock_id == sid && s.shelf.id == shelf_id));
    if shelves.len() == before {
        return Err(api("shelf not found"));
    }
    save(dir, "shelves.json", &shelves)?;
    Ok(json!({ "deleted": shelf_id }))
}

fn create_product(dir: &Path, sid: i64, body: &Value) -> anyhow::Result<Value> {
    let input: ProductInput =
        serde_json::from_value(body.clone()).map_err(|_| api("invalid product payload"))?;
    if input.name.trim().is_empty() {
        return Err(api("product name is required"));
    }
    if input.quantity < 0 {
        return Err(api("quantity cannot be negative"));
    }
    let shelves: Vec<StoredShelf> = load(dir, "shelves.json")?;
    let shelf = shelves
        .iter()
        .find(|s| s.stock_id == sid && s.shelf.id == input.shelf_id)
        .ok_or_else(|| api("shelf not found"))?;
    if input.position.row >= shelf.shelf.rows || input.position.column >= shelf.shelf.columns {
        return Err(api(format!(
            "position out of bounds for shelf {}",
            shelf.shelf.name
        )));
    }
    let mut products: Vec<StoredProduct> = load(dir, "products.json")?;
    let occupied = products.iter().any(|p| {
        p.stock_id == sid
            && p.product.shelf_id == input.shelf_id
            && p.product.position == input.position
    });
    if occupied {
        return Err(api("position already occupied"));
    }
    let id = products.iter().map(|p| p.product.id).max().unwrap_or(0) + 1;
    let product = Product {
        id,
        ean: input.ean,
        name: input.name,
        description: input.description,
        kind: input.kind,
        lot_type: input.lot_type,
        quantity_per_lot: input.quantity_per_lot,
        weight: input.weight,
        quantity: input.quantity,
        expiry_date: input.expiry_date,
        shelf_id: input.shelf_id,
        position: input.position,
    };
    products.push(StoredProduct {
        product: product.clone(),
        stock_id: sid,
    });
    save(dir, "products.json", &products)?;
    Ok(serde_json::to_value(product)?)
}

fn update_product(dir: &Path, sid: i64, id: i64, body: &Value) -> anyhow::Result<Value> {
    let patch: ProductPatch =
        serde_json::from_value(body.clone()).map_err(|_| api("invalid product payload"))?;
    let mut products: Vec<StoredProduct> = load(dir, "products.json")?;
    let stored = products
        .iter_mut()
        .find(|p| p.stock_id == sid && p.product.id == id)
        .ok_or_else(|| api("product not found"))?;
    if let Some(ean) = patch.ean {
        stored.product.ean = ean;
    }
    if let Some(name) = patch.name {
        stored.product.name = name;
    }
    if let Some(description) = patch.description {
        stored.product.description = Some(description);
    }
    if let Some(kind) = patch.kind {
        stored.product.kind = kind;
    }
    if let Some(lot_type) = patch.lot_type {
        stored.product.lot_type = lot_type;
    }
    if let Some(quantity_per_lot) = patch.quantity_per_lot {
        stored.product.quantity_per_lot = quantity_per_lot;
    }
    if let Some(weight) = patch.weight {
        stored.product.weight = Some(weight);
    }
    if let Some(expiry_date) = patch.expiry_date {
        stored.product.expiry_date = Some(expiry_date);
    }
    let updated = stored.product.clone();
    save(dir, "products.json", &products)?;
    Ok(serde_json::to_value(updated)?)
}

fn adjust_quantity(dir: &Path, sid: i64, id: i64, body: &Value) -> anyhow::Result<Value> {
    let quantity = body
        .get("quantity")
        .and_then(Value::as_i64)
        .ok_or_else(|| api("invalid quantity payload"))?;
    if quantity < 0 {
        return Err(api("quantity cannot be negative"));
    }
    let mut products: Vec<StoredProduct> = load(dir, "products.json")?;
    let stored = products
        .iter_mut()
        .find(|p| p.stock_id == sid && p.product.id == id)
        .ok_or_else(|| api("product not found"))?;
    stored.product.quantity = quantity;
    let updated = stored.product.clone();
    save(dir, "products.json", &products)?;
    Ok(serde_json::to_value(updated)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CellPosition;
    use tempfile::TempDir;

    fn seed(dir: &Path) {
        save(
            dir,
            "users.json",
            &[StoredUser {
                id: 1,
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password_sha256: password_digest("segredo"),
            }],
        )
        .unwrap();
        save(
            dir,
            "stocks.json",
            &[Stock {
                id: 1,
                name: "Central".to_string(),
                description: None,
            }],
        )
        .unwrap();
        save(
            dir,
            "shelves.json",
            &[StoredShelf {
                shelf: Shelf {
                    id: 1,
                    name: "Shelf A".to_string(),
                    rows: 4,
                    columns: 5,
                    destination_type: None,
                    restrictions: None,
                },
                stock_id: 1,
            }],
        )
        .unwrap();
        save(
            dir,
            "products.json",
            &[StoredProduct {
                product: Product {
                    id: 101,
                    ean: "111".to_string(),
                    name: "Pen Box".to_string(),
                    description: None,
                    kind: "stationery".to_string(),
                    lot_type: "box".to_string(),
                    quantity_per_lot: 100,
                    weight: None,
                    quantity: 150,
                    expiry_date: None,
                    shelf_id: 1,
                    position: CellPosition { row: 0, column: 1 },
                },
                stock_id: 1,
            }],
        )
        .unwrap();
    }

    fn token(dir: &Path) -> String {
        let out = login(
            dir,
            &json!({ "email": "ana@example.com", "password": "segredo" }),
        )
        .unwrap();
        out["token"].as_str().unwrap().to_string()
    }

    #[test]
    fn login_rejects_wrong_password() {
        let tmp = TempDir::new().unwrap();
        seed(tmp.path());
        let err = login(
            tmp.path(),
            &json!({ "email": "ana@example.com", "password": "nope" }),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid email or password");
    }

    #[test]
    fn create_product_rejects_occupied_position() {
        let tmp = TempDir::new().unwrap();
        seed(tmp.path());
        let tok = token(tmp.path());
        let body = json!({
            "name": "Notebook",
            "quantity": 10,
            "shelfId": 1,
            "position": { "row": 0, "column": 1 }
        });
        let err = handle(
            tmp.path(),
            Method::Post,
            "/product",
            &[],
            Some(&body),
            Some(tok.as_str()),
            Some(1),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "position already occupied");
    }

    #[test]
    fn create_product_rejects_out_of_bounds_position() {
        let tmp = TempDir::new().unwrap();
        seed(tmp.path());
        let tok = token(tmp.path());
        let body = json!({
            "name": "Notebook",
            "quantity": 10,
            "shelfId": 1,
            "position": { "row": 9, "column": 0 }
        });
        let err = handle(
            tmp.path(),
            Method::Post,
            "/product",
            &[],
            Some(&body),
            Some(tok.as_str()),
            Some(1),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("position out of bounds"));
    }

    #[test]
    fn shelf_layout_includes_items() {
        let tmp = TempDir::new().unwrap();
        seed(tmp.path());
        let tok = token(tmp.path());
        let layout = handle(
            tmp.path(),
            Method::Get,
            "/shelf/1",
            &[],
            None,
            Some(tok.as_str()),
            Some(1),
        )
        .unwrap();
        assert_eq!(layout["rows"], 4);
        assert_eq!(layout["items"][0]["productId"], 101);
        assert_eq!(layout["items"][0]["position"]["column"], 1);
    }
}
