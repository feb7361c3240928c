// storefront/src/seed.rs

//! Demo catalog loaded at startup when `SEED_DB` is set.

use crate::models::{Category, Product, Size};
use crate::store::{Store, StoreResult};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

const MIN_STOCK: u32 = 10;
const MAX_STOCK: u32 = 100;

struct DemoProduct {
  name: &'static str,
  description: &'static str,
  /// Price in cents.
  price: i64,
  image: &'static str,
  category: Category,
}

const DEMO_PRODUCTS: &[DemoProduct] = &[
  DemoProduct {
    name: "Classic White T-Shirt",
    description: "Premium cotton blend t-shirt with a comfortable fit. Perfect for everyday wear and casual occasions. Soft fabric that gets better with each wash.",
    price: 2499,
    image: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Denim Jacket",
    description: "Classic denim jacket with a timeless design. Made from high-quality denim fabric, featuring button closure and chest pockets. A wardrobe essential.",
    price: 7999,
    image: "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Slim Fit Jeans",
    description: "Modern slim-fit jeans with stretch fabric for comfort. Perfect fit that flatters your silhouette. Available in classic blue wash.",
    price: 5999,
    image: "https://images.unsplash.com/photo-1542272604-787c3835535d?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Cotton Hoodie",
    description: "Cozy and comfortable hoodie made from premium cotton blend. Features a drawstring hood, front kangaroo pocket, and ribbed cuffs. Perfect for casual wear.",
    price: 4999,
    image: "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Polo Shirt",
    description: "Classic polo shirt with a modern twist. Made from breathable pique cotton, featuring a three-button placket and ribbed collar. Versatile for both casual and semi-formal occasions.",
    price: 3999,
    image: "https://images.unsplash.com/photo-1583743814966-8936f5b7be1a?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Leather Jacket",
    description: "Genuine leather jacket with a timeless biker style. Features zippered front, multiple pockets, and a comfortable fit. A statement piece for your wardrobe.",
    price: 19999,
    image: "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Cargo Pants",
    description: "Functional cargo pants with multiple pockets. Made from durable cotton twill fabric. Perfect for outdoor activities and casual wear.",
    price: 5499,
    image: "https://images.unsplash.com/photo-1506629905607-0e2e0e0b0c0d?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Sweatpants",
    description: "Comfortable sweatpants with an elastic waistband and drawstring. Made from soft fleece material. Ideal for lounging or workouts.",
    price: 3499,
    image: "https://images.unsplash.com/photo-1506629905607-0e2e0e0b0c0d?w=500",
    category: Category::Men,
  },
  DemoProduct {
    name: "Floral Summer Dress",
    description: "Beautiful floral print dress perfect for summer. Made from lightweight, breathable fabric with a flattering A-line silhouette. Features a comfortable fit and elegant design.",
    price: 6499,
    image: "https://images.unsplash.com/photo-1595777457583-95e059d581b8?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "Women's Denim Jacket",
    description: "Stylish denim jacket tailored for women. Features a cropped fit, button closure, and classic denim wash. Versatile piece that pairs with any outfit.",
    price: 6999,
    image: "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "High-Waisted Jeans",
    description: "Trendy high-waisted jeans with a flattering fit. Made from premium denim with stretch for comfort. Features a modern cut that elongates your silhouette.",
    price: 5999,
    image: "https://images.unsplash.com/photo-1542272604-787c3835535d?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "Oversized Hoodie",
    description: "Comfortable oversized hoodie with a relaxed fit. Made from soft cotton blend fabric. Features a drawstring hood and front pocket. Perfect for casual, cozy days.",
    price: 4499,
    image: "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "Blouse with Ruffles",
    description: "Elegant blouse with delicate ruffled details. Made from soft, flowy fabric. Perfect for office wear or special occasions. Features a button-down front.",
    price: 4999,
    image: "https://images.unsplash.com/photo-1594633312681-425c7b97ccd1?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "Maxi Dress",
    description: "Flowing maxi dress with a bohemian style. Made from lightweight, breathable fabric. Features an elastic waist and comfortable fit. Perfect for summer events.",
    price: 7499,
    image: "https://images.unsplash.com/photo-1595777457583-95e059d581b8?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "Leather Moto Jacket",
    description: "Stylish leather moto jacket with a modern design. Features zippered front, asymmetrical collar, and multiple pockets. A statement piece for any wardrobe.",
    price: 18999,
    image: "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "Yoga Leggings",
    description: "High-performance yoga leggings with moisture-wicking fabric. Features a high waistband and four-way stretch. Perfect for workouts or athleisure wear.",
    price: 3999,
    image: "https://images.unsplash.com/photo-1506629905607-0e2e0e0b0c0d?w=500",
    category: Category::Women,
  },
  DemoProduct {
    name: "Kids' Graphic T-Shirt",
    description: "Fun and colorful graphic t-shirt for kids. Made from soft, child-friendly cotton. Features fun prints and comfortable fit. Machine washable and durable.",
    price: 1999,
    image: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=500",
    category: Category::Kids,
  },
  DemoProduct {
    name: "Children's Denim Jacket",
    description: "Classic denim jacket designed for kids. Made from durable, soft denim fabric. Features button closure and chest pockets. Perfect for playtime and casual wear.",
    price: 3999,
    image: "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=500",
    category: Category::Kids,
  },
  DemoProduct {
    name: "Kids' Jeans",
    description: "Durable jeans for active kids. Made from stretch denim for comfort and flexibility. Features reinforced knees and adjustable waist. Perfect for everyday play.",
    price: 2999,
    image: "https://images.unsplash.com/photo-1542272604-787c3835535d?w=500",
    category: Category::Kids,
  },
  DemoProduct {
    name: "Children's Hoodie",
    description: "Cozy hoodie for kids with fun designs. Made from soft, warm fabric. Features a drawstring hood and front pocket. Perfect for cool weather and playtime.",
    price: 3499,
    image: "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=500",
    category: Category::Kids,
  },
  DemoProduct {
    name: "Girls' Floral Dress",
    description: "Adorable floral dress for little girls. Made from soft, comfortable fabric. Features a twirl-worthy skirt and comfortable fit. Perfect for parties and special occasions.",
    price: 3999,
    image: "https://images.unsplash.com/photo-1595777457583-95e059d581b8?w=500",
    category: Category::Kids,
  },
  DemoProduct {
    name: "Kids' Sweatpants",
    description: "Comfortable sweatpants for active kids. Made from soft, durable fabric. Features an elastic waistband and reinforced seams. Perfect for playtime and lounging.",
    price: 2499,
    image: "https://images.unsplash.com/photo-1506629905607-0e2e0e0b0c0d?w=500",
    category: Category::Kids,
  },
];

fn random_stock() -> i32 {
  let span = MAX_STOCK - MIN_STOCK + 1;
  (MIN_STOCK + OsRng.next_u32() % span) as i32
}

/// Products built from the demo set. Creation times are staggered by a second
/// so "newest first" follows declaration order in reverse.
pub fn demo_catalog() -> Vec<Product> {
  let base = Utc::now();
  DEMO_PRODUCTS
    .iter()
    .enumerate()
    .map(|(idx, demo)| {
      let created_at = base - Duration::seconds((DEMO_PRODUCTS.len() - idx) as i64);
      Product {
        id: Uuid::new_v4(),
        name: demo.name.to_string(),
        description: demo.description.to_string(),
        price: Decimal::new(demo.price, 2),
        image_url: demo.image.to_string(),
        category: demo.category,
        sizes: Size::ALL.to_vec(),
        stock: random_stock(),
        created_at,
        updated_at: created_at,
      }
    })
    .collect()
}

/// Replaces the whole catalog with the demo set and logs a per-category summary.
#[instrument(name = "seed::seed_catalog", skip(store))]
pub async fn seed_catalog(store: &dyn Store) -> StoreResult<usize> {
  let products = demo_catalog();
  store.replace_catalog(&products).await?;
  info!(count = products.len(), "Catalog seeded.");

  for category in Category::ALL {
    let count = products.iter().filter(|p| p.category == category).count();
    info!(%category, count, "Seeded products per category.");
  }
  Ok(products.len())
}
