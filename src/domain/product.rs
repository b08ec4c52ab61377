use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub original_price_cents: Option<i64>,
    pub discount_percent: Option<u8>,
    pub rating: f32,
    pub reviews_count: u32,
    pub sold_count: u32,
    pub video_url: Option<String>,
    pub cover_url: String,
    pub images: Vec<String>,
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    pub fn has_discount(&self) -> bool {
        self.original_price_cents
            .is_some_and(|original| original > self.price_cents)
    }

    pub fn discount_label(&self) -> Option<String> {
        self.discount_percent
            .filter(|pct| *pct > 0)
            .map(|pct| format!("-{}%", pct))
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Products shipped with the storefront feed.
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product {
            id: "prod_001".to_string(),
            sku: "LATTAFA-SAFEER".to_string(),
            name: "Perfume Árabe Lattafa Al Noble Safeer - 100ml Original".to_string(),
            description: "Fragrância luxuosa com notas amadeiradas e especiarias. Importado diretamente de Dubai. Alta fixação e projeção.".to_string(),
            price_cents: 20691,
            original_price_cents: Some(39990),
            discount_percent: Some(48),
            rating: 4.9,
            reviews_count: 29,
            sold_count: 186,
            video_url: Some("https://cdn.coverr.co/videos/coverr-spraying-perfume-5339/1080p.mp4".to_string()),
            cover_url: "https://m.media-amazon.com/images/I/71J185-y+IL._AC_SL1500_.jpg".to_string(),
            images: vec![
                "https://m.media-amazon.com/images/I/71J185-y+IL._AC_SL1500_.jpg".to_string(),
                "https://m.media-amazon.com/images/I/71+M+X0J7dL._AC_SL1500_.jpg".to_string(),
            ],
            stock: 50,
            tags: vec!["Frete grátis".to_string(), "25% OFF".to_string()],
        },
        Product {
            id: "prod_002".to_string(),
            sku: "PROJ-SCREEN".to_string(),
            name: "Tela de Projeção Portátil 100 Polegadas 16:9".to_string(),
            description: "Tela dobrável para projetor, instalação sem ferramentas, ideal para cinema em casa e apresentações.".to_string(),
            price_cents: 8990,
            original_price_cents: Some(14990),
            discount_percent: Some(40),
            rating: 4.7,
            reviews_count: 112,
            sold_count: 870,
            video_url: None,
            cover_url: "https://m.media-amazon.com/images/I/61S0lKxM6FL._AC_SL1500_.jpg".to_string(),
            images: vec!["https://m.media-amazon.com/images/I/61S0lKxM6FL._AC_SL1500_.jpg".to_string()],
            stock: 120,
            tags: vec!["Mais vendido".to_string()],
        },
        Product {
            id: "prod_003".to_string(),
            sku: "EARBUDS-PRO".to_string(),
            name: "Fone Bluetooth Sem Fio com Cancelamento de Ruído".to_string(),
            description: "Bateria de longa duração, estojo de carregamento e conexão estável.".to_string(),
            price_cents: 12990,
            original_price_cents: None,
            discount_percent: None,
            rating: 4.5,
            reviews_count: 64,
            sold_count: 310,
            video_url: None,
            cover_url: "https://m.media-amazon.com/images/I/61SUj2aKoEL._AC_SL1500_.jpg".to_string(),
            images: vec!["https://m.media-amazon.com/images/I/61SUj2aKoEL._AC_SL1500_.jpg".to_string()],
            stock: 0,
            tags: Vec::new(),
        },
    ]
}

pub fn find_product(catalog: &[Product], id: &str) -> Option<Product> {
    catalog.iter().find(|p| p.id == id).cloned()
}
