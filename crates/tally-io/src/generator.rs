//! # Synthetic Datasets
//!
//! Writes a complete, self-consistent input set: salesman info, product
//! catalog and one transaction file per salesman.
//!
//! All randomness comes from one [`StdRng`], so the same seed and settings
//! always produce byte-identical files.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tally_core::{Product, Salesman};
use tracing::info;

use crate::delimited::create_writer;
use crate::error::{IoError, IoResult};
use crate::pipeline::Layout;

const FIRST_NAMES: [&str; 10] = [
    "Juan", "Maria", "Carlos", "Ana", "David", "Sofia", "Jose", "Laura", "Francisco", "Carmen",
];

const LAST_NAMES: [&str; 10] = [
    "Gomez", "Lopez", "Martinez", "Garcia", "Rodriguez", "Perez", "Sanchez", "Torres", "Ramirez", "Castro",
];

/// Half-open range of generated document numbers (8 digits).
const DOCUMENT_NUMBERS: std::ops::Range<i64> = 10_000_000..100_000_000;

/// Half-open range of generated unit prices.
const UNIT_PRICES: std::ops::Range<f64> = 10.0..150.0;

const MAX_QUANTITY: u32 = 20;

/// Sizes of a generated dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub salesmen: usize,
    pub products: usize,
    pub sales_per_salesman: usize,
    pub document_type: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            salesmen: 10,
            products: 50,
            sales_per_salesman: 10,
            document_type: "CC".to_string(),
        }
    }
}

/// Files written by [`Generator::write_dataset`].
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub salesmen: usize,
    pub products: usize,
    pub sale_files: usize,
}

/// Seeded source of synthetic records.
#[derive(Debug)]
pub struct Generator {
    rng: StdRng,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Generator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `count` salesmen with random names and 8-digit document numbers.
    pub fn salesmen(&mut self, count: usize, document_type: &str) -> Vec<Salesman> {
        (0..count)
            .map(|_| {
                let first = FIRST_NAMES[self.rng.gen_range(0..FIRST_NAMES.len())];
                let last = LAST_NAMES[self.rng.gen_range(0..LAST_NAMES.len())];
                let number = self.rng.gen_range(DOCUMENT_NUMBERS);
                Salesman::new(document_type, number, first, last)
            })
            .collect()
    }

    /// Products with ids `1..=count`.
    pub fn products(&mut self, count: usize) -> Vec<Product> {
        (1..=count)
            .map(|id| {
                let price = self.rng.gen_range(UNIT_PRICES);
                Product::new(id.to_string(), format!("Product-{id}"), price)
            })
            .collect()
    }

    /// `count` `(product id, quantity)` lines referencing ids `1..=products`.
    pub fn sales_lines(&mut self, products: usize, count: usize) -> Vec<(usize, u32)> {
        if products == 0 {
            return Vec::new();
        }
        (0..count)
            .map(|_| {
                let id = self.rng.gen_range(1..=products);
                let quantity = self.rng.gen_range(1..=MAX_QUANTITY);
                (id, quantity)
            })
            .collect()
    }

    /// Writes the salesman file, product file and sales directory of `layout`.
    pub fn write_dataset(&mut self, layout: &Layout, settings: &GeneratorSettings) -> IoResult<DatasetSummary> {
        let salesmen = self.salesmen(settings.salesmen, &settings.document_type);
        let products = self.products(settings.products);

        let mut writer = create_writer(&layout.salesmen_file)?;
        for s in &salesmen {
            let number = s.document_number.to_string();
            writer
                .write_record([s.document_type.as_str(), number.as_str(), s.first_name.as_str(), s.last_name.as_str()])
                .map_err(|e| IoError::csv(&layout.salesmen_file, e))?;
        }
        writer.flush().map_err(|e| IoError::io(&layout.salesmen_file, e))?;

        let mut writer = create_writer(&layout.products_file)?;
        for p in &products {
            let price = p.unit_price.to_string();
            writer
                .write_record([p.product_id.as_str(), p.product_name.as_str(), price.as_str()])
                .map_err(|e| IoError::csv(&layout.products_file, e))?;
        }
        writer.flush().map_err(|e| IoError::io(&layout.products_file, e))?;

        for s in &salesmen {
            let file_name = format!("{}_{}.csv", s.full_name(), s.document_number);
            let lines = self.sales_lines(settings.products, settings.sales_per_salesman);
            write_sales_file(&layout.sales_dir.join(file_name), s, &lines)?;
        }

        info!(
            salesmen = salesmen.len(),
            products = products.len(),
            sales_dir = %layout.sales_dir.display(),
            "Synthetic dataset written"
        );

        Ok(DatasetSummary {
            salesmen: salesmen.len(),
            products: products.len(),
            sale_files: salesmen.len(),
        })
    }
}

fn write_sales_file(path: &Path, salesman: &Salesman, lines: &[(usize, u32)]) -> IoResult<()> {
    let mut writer = create_writer(path)?;
    let number = salesman.document_number.to_string();
    writer
        .write_record([salesman.document_type.as_str(), number.as_str()])
        .map_err(|e| IoError::csv(path, e))?;
    for (id, quantity) in lines {
        writer
            .write_record([id.to_string(), quantity.to_string()])
            .map_err(|e| IoError::csv(path, e))?;
    }
    writer.flush().map_err(|e| IoError::io(path, e))
}
