//! Table and JSON rendering of command results

use anyhow::Result;
use backoffice_http::types::{Page, Person, Product};
use serde::Serialize;

/// Page size assumed by the API when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned plain-text table
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![line(self.headers.clone())];
        lines.extend(
            self.rows
                .iter()
                .map(|row| line(row.iter().map(String::as_str).collect())),
        );
        lines.join("\n")
    }
}

/// "page X of Y (N total)"
pub fn page_footer<T>(page: &Page<T>, current: Option<u32>, page_size: Option<u32>) -> String {
    let total_pages = page
        .total_pages(page_size.unwrap_or(DEFAULT_PAGE_SIZE))
        .max(1);
    format!(
        "page {} of {} ({} total)",
        current.unwrap_or(1),
        total_pages,
        page.count
    )
}

pub fn persons_table(persons: &[Person]) -> Table {
    let mut table = Table::new(vec!["ID", "NAME", "EMAIL"]);
    for person in persons {
        table.row(vec![
            person.id.to_string(),
            person.full_name(),
            person.email.clone(),
        ]);
    }
    table
}

pub fn products_table(products: &[Product]) -> Table {
    let mut table = Table::new(vec!["ID", "NAME", "SKU", "PRICE", "OWNER"]);
    for product in products {
        let owner = match (&product.owner_details, product.owner) {
            (Some(details), _) => format!("{} {}", details.first_name, details.last_name),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "-".to_string(),
        };
        table.row(vec![
            product.id.to_string(),
            product.name.clone(),
            product.sku.clone(),
            product.price.to_string(),
            owner,
        ]);
    }
    table
}

pub fn print_person(person: &Person) {
    println!("ID:         {}", person.id);
    println!("Name:       {}", person.full_name());
    println!("Email:      {}", person.email);
    if let Some(created) = person.created_at {
        println!("Created:    {}", created.format("%Y-%m-%d %H:%M"));
    }
    if let Some(updated) = person.updated_at {
        println!("Updated:    {}", updated.format("%Y-%m-%d %H:%M"));
    }
}

pub fn print_product(product: &Product) {
    println!("ID:         {}", product.id);
    println!("Name:       {}", product.name);
    println!("SKU:        {}", product.sku);
    println!("Price:      {}", product.price);
    match (&product.owner_details, product.owner) {
        (Some(owner), _) => println!(
            "Owner:      {} {} <{}>",
            owner.first_name, owner.last_name, owner.email
        ),
        (None, Some(id)) => println!("Owner:      #{id}"),
        (None, None) => println!("Owner:      -"),
    }
    if let Some(created) = product.created_at {
        println!("Created:    {}", created.format("%Y-%m-%d %H:%M"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_aligns_columns() {
        let mut table = Table::new(vec!["ID", "NAME"]);
        table.row(vec!["1".into(), "Juan Pérez".into()]);
        table.row(vec!["12".into(), "Ana".into()]);

        assert_eq!(table.render(), "ID  NAME\n1   Juan Pérez\n12  Ana");
    }

    #[test]
    fn test_page_footer() {
        let page: Page<Person> = Page {
            count: 25,
            next: None,
            previous: None,
            results: vec![],
        };
        assert_eq!(page_footer(&page, Some(2), None), "page 2 of 3 (25 total)");
        assert_eq!(page_footer(&page, None, Some(50)), "page 1 of 1 (25 total)");

        let empty: Page<Person> = Page {
            count: 0,
            next: None,
            previous: None,
            results: vec![],
        };
        assert_eq!(page_footer(&empty, None, None), "page 1 of 1 (0 total)");
    }
}
