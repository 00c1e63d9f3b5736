//! Demo data: 50 stationery products spread across every stock status

use shared::catalog::slugify;
use shared::{CreateProductInput, StockStatus};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::CatalogService;

const PRODUCT_NAMES: [&str; 50] = [
    "Caneta Azul",
    "Caneta Preta",
    "Caneta Vermelha",
    "Caneta Verde",
    "Caneta Amarela",
    "Caneta Marrom",
    "Lápis HB",
    "Lápis 2B",
    "Lápis Preto",
    "Lapiseira 0.5mm",
    "Lapiseira 0.7mm",
    "Borracha Branca",
    "Borracha Escolar",
    "Caderno Universitário",
    "Caderno de Desenho",
    "Caderno Pequeno",
    "Caderno Pautado",
    "Caderno Quadriculado",
    "Marcador de Texto Amarelo",
    "Marcador de Texto Rosa",
    "Marcador de Texto Verde",
    "Marcador de Texto Azul",
    "Post-it Amarelo",
    "Post-it Colorido",
    "Régua 30cm",
    "Régua 15cm",
    "Clips Metálico",
    "Clips Colorido",
    "Grampeador Pequeno",
    "Grampeador Médio",
    "Grampo 26/6",
    "Grampo 24/6",
    "Fita Adesiva Transparente",
    "Fita Adesiva Marrom",
    "Fita Dupla Face",
    "Tesoura Escolar",
    "Tesoura de Escritório",
    "Cola Branca 90g",
    "Cola Bastão",
    "Pasta Catálogo",
    "Pasta Sanfonada",
    "Pasta L",
    "Envelope A4",
    "Envelope Ofício",
    "Apontador Simples",
    "Apontador com Depósito",
    "Canetão Quadro Branco Preto",
    "Canetão Quadro Branco Azul",
    "Pincel Atômico Preto",
    "Pincel Atômico Vermelho",
];

/// One product to seed and the stock it starts with
#[derive(Debug, Clone, PartialEq)]
pub struct SeedProduct {
    pub name: String,
    pub sku: String,
    pub min_stock: i32,
    pub initial_stock: i32,
    pub status: StockStatus,
}

/// `"Lápis HB"` at position 7 becomes `LAPIS_HB_007`
pub fn seed_sku(name: &str, position: usize) -> String {
    format!("{}_{:03}", slugify(name).to_uppercase().replace('-', "_"), position)
}

/// Deterministic seed plan: 20 OK, 15 ATTN and 15 OUT products
pub fn seed_plan() -> Vec<SeedProduct> {
    PRODUCT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let min_stock = 3 + (i * 7 % 18) as i32;
            let (status, initial_stock) = match i % 10 {
                0..=3 => (StockStatus::Ok, min_stock + (i % 26) as i32),
                4..=6 => (StockStatus::Attn, 1 + (i as i32 % (min_stock - 1))),
                _ => (StockStatus::Out, 0),
            };
            SeedProduct {
                name: name.to_string(),
                sku: seed_sku(name, i + 1),
                min_stock,
                initial_stock,
                status,
            }
        })
        .collect()
}

/// Insert the seed plan, skipping SKUs that already exist. Returns how many
/// products were created.
pub async fn run(db: &PgPool) -> AppResult<usize> {
    let service = CatalogService::new(db.clone());
    let mut created = 0;

    for item in seed_plan() {
        let input = CreateProductInput {
            description: Some(format!("{} de papelaria.", item.name)),
            name: item.name.clone(),
            sku: item.sku.clone(),
            min_stock: item.min_stock,
            initial_stock: Some(item.initial_stock),
        };

        match service.create_product(input).await {
            Ok(product) => {
                created += 1;
                tracing::info!(
                    "Created {} | sku={} | min={} | balance={} | status={}",
                    product.product.name,
                    product.product.sku,
                    product.product.min_stock,
                    product.balance,
                    product.status
                );
            }
            Err(AppError::DuplicateEntry(_)) => {
                tracing::info!("Product already exists, skipping: {}", item.sku);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(created)
}
