//! Sample catalog data
//!
//! Loads the demo paintings and the admin account. Safe to run repeatedly:
//! products are upserted by title and artist, and the admin is only created
//! when missing.

use crate::domain::{Category, NewProduct, NewUser, Price, Role};
use crate::error::{AppError, AppResult};
use crate::repository::{ProductCatalog, UserRepository};

pub const ADMIN_EMAIL: &str = "admin@artmarket.com";

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub products_upserted: usize,
    pub admin_created: bool,
}

struct SampleProduct {
    title: &'static str,
    description: &'static str,
    price: u32,
    artist: &'static str,
    category: Category,
    medium: &'static str,
    dimensions: &'static str,
    year: i32,
    image: &'static str,
    tags: [&'static str; 4],
    featured: bool,
    rating: f64,
    num_reviews: i32,
}

impl SampleProduct {
    fn to_new_product(&self) -> NewProduct {
        NewProduct {
            title: self.title.to_string(),
            description: self.description.to_string(),
            price: Price::from_units(self.price),
            artist: self.artist.to_string(),
            category: self.category,
            medium: Some(self.medium.to_string()),
            dimensions: self.dimensions.to_string(),
            year: self.year,
            images: vec![self.image.to_string()],
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            in_stock: true,
            featured: self.featured,
            rating: self.rating,
            num_reviews: self.num_reviews,
        }
    }
}

const IMG_MOUNTAINS: &str =
    "https://images.pexels.com/photos/1070542/pexels-photo-1070542.jpeg?auto=compress&cs=tinysrgb&w=800";
const IMG_ABSTRACT: &str =
    "https://images.pexels.com/photos/1194420/pexels-photo-1194420.jpeg?auto=compress&cs=tinysrgb&w=800";
const IMG_PORTRAIT: &str =
    "https://images.pexels.com/photos/1560424/pexels-photo-1560424.jpeg?auto=compress&cs=tinysrgb&w=800";
const IMG_FLOWERS: &str =
    "https://images.pexels.com/photos/1324803/pexels-photo-1324803.jpeg?auto=compress&cs=tinysrgb&w=800";

const SAMPLE_PRODUCTS: [SampleProduct; 8] = [
    SampleProduct {
        title: "Sunset Over Mountains",
        description: "A breathtaking landscape painting capturing the golden hour over majestic \
                      mountain peaks. The warm colors blend seamlessly to create a sense of peace \
                      and tranquility.",
        price: 450,
        artist: "Elena Rodriguez",
        category: Category::Landscape,
        medium: "Oil on Canvas",
        dimensions: "24\" x 36\"",
        year: 2023,
        image: IMG_MOUNTAINS,
        tags: ["sunset", "mountains", "landscape", "nature"],
        featured: true,
        rating: 4.8,
        num_reviews: 24,
    },
    SampleProduct {
        title: "Abstract Dreams",
        description: "A vibrant abstract composition that explores the relationship between \
                      color and emotion. Bold strokes and dynamic forms create a sense of \
                      movement and energy.",
        price: 320,
        artist: "Marcus Chen",
        category: Category::Abstract,
        medium: "Acrylic on Canvas",
        dimensions: "20\" x 24\"",
        year: 2024,
        image: IMG_ABSTRACT,
        tags: ["abstract", "colorful", "modern", "contemporary"],
        featured: true,
        rating: 4.6,
        num_reviews: 18,
    },
    SampleProduct {
        title: "Portrait of Grace",
        description: "An elegant portrait showcasing masterful technique in capturing human \
                      emotion and character. The subtle use of light and shadow brings the \
                      subject to life.",
        price: 680,
        artist: "Isabella Thompson",
        category: Category::Portrait,
        medium: "Oil on Canvas",
        dimensions: "18\" x 24\"",
        year: 2023,
        image: IMG_PORTRAIT,
        tags: ["portrait", "realistic", "classical", "elegant"],
        featured: false,
        rating: 4.9,
        num_reviews: 31,
    },
    SampleProduct {
        title: "Still Life with Flowers",
        description: "A delicate still life arrangement featuring fresh flowers in a vintage \
                      vase. The composition demonstrates perfect balance and attention to detail.",
        price: 280,
        artist: "David Park",
        category: Category::StillLife,
        medium: "Watercolor on Paper",
        dimensions: "16\" x 20\"",
        year: 2024,
        image: IMG_FLOWERS,
        tags: ["flowers", "still-life", "watercolor", "delicate"],
        featured: false,
        rating: 4.5,
        num_reviews: 12,
    },
    SampleProduct {
        title: "Urban Symphony",
        description: "A modern interpretation of city life through bold geometric forms and \
                      vibrant colors. This piece captures the energy and rhythm of urban \
                      environments.",
        price: 520,
        artist: "Sofia Andersson",
        category: Category::Modern,
        medium: "Mixed Media on Canvas",
        dimensions: "30\" x 40\"",
        year: 2024,
        image: IMG_MOUNTAINS,
        tags: ["urban", "modern", "geometric", "colorful"],
        featured: true,
        rating: 4.7,
        num_reviews: 22,
    },
    SampleProduct {
        title: "Classical Harmony",
        description: "A timeless piece inspired by classical masters, featuring perfect \
                      proportions and traditional techniques. This painting embodies the beauty \
                      of classical art.",
        price: 750,
        artist: "Alessandro Rossi",
        category: Category::Classical,
        medium: "Oil on Canvas",
        dimensions: "24\" x 30\"",
        year: 2023,
        image: IMG_ABSTRACT,
        tags: ["classical", "traditional", "masterpiece", "timeless"],
        featured: false,
        rating: 4.8,
        num_reviews: 28,
    },
    SampleProduct {
        title: "Ocean Waves",
        description: "Dynamic seascape capturing the power and beauty of ocean waves. The \
                      artist's skillful use of blues and whites creates a sense of movement and \
                      depth.",
        price: 390,
        artist: "Marina Kowalski",
        category: Category::Landscape,
        medium: "Oil on Canvas",
        dimensions: "22\" x 28\"",
        year: 2024,
        image: IMG_PORTRAIT,
        tags: ["ocean", "waves", "seascape", "blue"],
        featured: false,
        rating: 4.6,
        num_reviews: 19,
    },
    SampleProduct {
        title: "Geometric Patterns",
        description: "An exploration of mathematical beauty through geometric patterns and \
                      precise lines. This abstract work demonstrates the harmony found in \
                      geometric relationships.",
        price: 340,
        artist: "James Wilson",
        category: Category::Abstract,
        medium: "Acrylic on Canvas",
        dimensions: "20\" x 20\"",
        year: 2024,
        image: IMG_FLOWERS,
        tags: ["geometric", "patterns", "mathematical", "precise"],
        featured: false,
        rating: 4.4,
        num_reviews: 15,
    },
];

/// The demo paintings, validated
pub fn sample_products() -> AppResult<Vec<NewProduct>> {
    SAMPLE_PRODUCTS
        .iter()
        .map(|sample| sample.to_new_product().normalized().map_err(AppError::from))
        .collect()
}

/// Upsert the sample catalog and ensure the admin account exists
pub async fn run(
    catalog: &dyn ProductCatalog,
    users: &dyn UserRepository,
) -> AppResult<SeedReport> {
    let products = sample_products()?;
    let mut products_upserted = 0;
    for product in products {
        let stored = catalog.upsert(product).await?;
        tracing::debug!(product_id = %stored.id, title = %stored.title, "Product seeded");
        products_upserted += 1;
    }
    tracing::info!(count = products_upserted, "Sample products upserted");

    let admin_created = if users.find_by_email(ADMIN_EMAIL).await?.is_some() {
        false
    } else {
        let admin = users
            .insert(NewUser {
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: ADMIN_EMAIL.to_string(),
                role: Role::Admin,
            })
            .await?;
        tracing::info!(user_id = %admin.id, "Admin user created");
        true
    };

    Ok(SeedReport {
        products_upserted,
        admin_created,
    })
}
