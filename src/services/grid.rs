//! Shelf grid logic: layout invariants, occupancy lookup, text rendering.

use crate::cli::GridMode;
use crate::domain::errors::AppError;
use crate::domain::models::{ShelfItem, ShelfLayout};
use std::collections::HashSet;

/// Boundary check, applied whenever a layout is parsed: every occupied
/// cell must lie inside the grid and no two items may share a cell.
pub fn validate(layout: &ShelfLayout) -> anyhow::Result<()> {
    if layout.rows == 0 || layout.columns == 0 {
        return Err(AppError::api(format!(
            "invalid shelf layout: {} has a zero-sized grid",
            layout.name
        ))
        .into());
    }
    let mut seen = HashSet::new();
    for item in &layout.items {
        if item.position.row >= layout.rows || item.position.column >= layout.columns {
            return Err(AppError::api(format!(
                "invalid shelf layout: {} sits outside the {}x{} grid",
                item.name, layout.rows, layout.columns
            ))
            .into());
        }
        if !seen.insert((item.position.row, item.position.column)) {
            return Err(AppError::api(format!(
                "invalid shelf layout: two items share (L: {}, C: {})",
                item.position.row + 1,
                item.position.column + 1
            ))
            .into());
        }
    }
    Ok(())
}

pub fn in_bounds(layout: &ShelfLayout, row: u32, column: u32) -> bool {
    row < layout.rows && column < layout.columns
}

pub fn item_at(layout: &ShelfLayout, row: u32, column: u32) -> Option<&ShelfItem> {
    layout
        .items
        .iter()
        .find(|item| item.position.row == row && item.position.column == column)
}

pub fn build(layout: &ShelfLayout) -> Vec<Vec<Option<&ShelfItem>>> {
    let mut grid = vec![vec![None; layout.columns as usize]; layout.rows as usize];
    for item in &layout.items {
        grid[item.position.row as usize][item.position.column as usize] = Some(item);
    }
    grid
}

pub fn render(layout: &ShelfLayout, mode: GridMode) -> String {
    let grid = build(layout);
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {} rows x {} columns\n",
        layout.name, layout.rows, layout.columns
    ));
    out.push_str("     ");
    for column in 0..layout.columns {
        out.push_str(&format!("{column:^12}"));
    }
    out.push('\n');
    for (row, cells) in grid.iter().enumerate() {
        out.push_str(&format!("{row:>4} "));
        for cell in cells {
            match cell {
                Some(item) => out.push_str(&format!("[{:^10}]", clip(&item.name, 10))),
                None => out.push_str(&format!("[{:^10}]", "empty")),
            }
        }
        out.push('\n');
    }
    if let GridMode::Select = mode {
        out.push_str("pick an empty cell with: estoq shelf pick <shelf-id> <row> <column>\n");
    }
    out
}

fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CellPosition;

    fn item(product_id: i64, name: &str, row: u32, column: u32) -> ShelfItem {
        ShelfItem {
            product_id,
            name: name.to_string(),
            position: CellPosition { row, column },
        }
    }

    fn layout(items: Vec<ShelfItem>) -> ShelfLayout {
        ShelfLayout {
            id: 1,
            name: "Shelf A".to_string(),
            rows: 4,
            columns: 5,
            destination_type: None,
            restrictions: None,
            items,
        }
    }

    #[test]
    fn build_places_items_and_leaves_gaps() {
        let l = layout(vec![item(101, "Pen Box", 0, 1), item(102, "Notebook", 2, 3)]);
        let grid = build(&l);
        assert!(grid[0][1].is_some());
        assert!(grid[2][3].is_some());
        assert!(grid[0][0].is_none());
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0].len(), 5);
    }

    #[test]
    fn item_at_distinguishes_occupied_and_empty() {
        let l = layout(vec![item(101, "Pen Box", 0, 1)]);
        assert_eq!(item_at(&l, 0, 1).map(|i| i.product_id), Some(101));
        assert!(item_at(&l, 1, 2).is_none());
    }

    #[test]
    fn bounds_are_half_open() {
        let l = layout(vec![]);
        assert!(in_bounds(&l, 3, 4));
        assert!(!in_bounds(&l, 4, 0));
        assert!(!in_bounds(&l, 0, 5));
    }

    #[test]
    fn validate_rejects_out_of_bounds_item() {
        let l = layout(vec![item(101, "Pen Box", 4, 0)]);
        assert!(validate(&l).is_err());
    }

    #[test]
    fn validate_rejects_shared_cell() {
        let l = layout(vec![item(101, "Pen Box", 1, 1), item(102, "Notebook", 1, 1)]);
        assert!(validate(&l).is_err());
    }

    #[test]
    fn validate_accepts_well_formed_layout() {
        let l = layout(vec![item(101, "Pen Box", 0, 1), item(102, "Notebook", 3, 4)]);
        assert!(validate(&l).is_ok());
    }

    #[test]
    fn render_marks_empty_and_occupied_cells() {
        let l = layout(vec![item(101, "Pen Box", 0, 1)]);
        let text = render(&l, GridMode::View);
        assert!(text.contains("Pen Box"));
        assert!(text.contains("empty"));
        assert!(!text.contains("shelf pick"));
        let select = render(&l, GridMode::Select);
        assert!(select.contains("shelf pick"));
    }
}
