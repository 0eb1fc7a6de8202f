//! Database seeder for Kontor development and testing.
//!
//! Seeds a `demo` tenant with an admin user, a small chart of accounts and
//! one stocked product. Running it twice is harmless: an existing `demo`
//! tenant is left untouched.
//!
//! Usage: cargo run --bin seeder

use kontor_core::auth::{UserRole, hash_password};
use kontor_db::{
    AccountRepository, ProductRepository, TenantRepository, UserRepository,
    repositories::{AccountInput, CreateUserInput, ProductInput, TenantInput},
};
use rust_decimal::Decimal;

const DEMO_SUBDOMAIN: &str = "demo";
const DEMO_ADMIN_EMAIL: &str = "admin@demo.kontor.dev";
const DEMO_ADMIN_PASSWORD: &str = "demo-password";

/// Chart of accounts: (code, name, type).
const ACCOUNTS: &[(&str, &str, &str)] = &[
    ("1000", "Cash", "asset"),
    ("1200", "Inventory", "asset"),
    ("2000", "Accounts Payable", "liability"),
    ("3000", "Owner's Equity", "equity"),
    ("4000", "Sales Revenue", "revenue"),
    ("5000", "Cost of Goods Sold", "expense"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kontor_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let tenants = TenantRepository::new(db.clone());
    if let Some(existing) = tenants
        .find_by_subdomain(DEMO_SUBDOMAIN)
        .await
        .expect("Failed to look up demo tenant")
    {
        println!("  Demo tenant already exists ({}), skipping...", existing.id);
        return;
    }

    println!("Seeding demo tenant...");
    let tenant = tenants
        .create(TenantInput {
            name: "Demo Company".to_string(),
            subdomain: DEMO_SUBDOMAIN.to_string(),
        })
        .await
        .expect("Failed to create demo tenant");

    println!("Seeding admin user...");
    let password_hash = hash_password(DEMO_ADMIN_PASSWORD).expect("Failed to hash password");
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            tenant_id: tenant.id,
            email: DEMO_ADMIN_EMAIL.to_string(),
            password_hash,
            first_name: "Demo".to_string(),
            last_name: "Admin".to_string(),
            role: UserRole::Admin.as_str().to_string(),
        })
        .await
        .expect("Failed to create admin user");

    println!("Seeding chart of accounts...");
    let accounts = AccountRepository::new(db.clone());
    for (code, name, account_type) in ACCOUNTS {
        accounts
            .create(
                tenant.id,
                AccountInput {
                    code: (*code).to_string(),
                    name: (*name).to_string(),
                    account_type: (*account_type).to_string(),
                    description: String::new(),
                },
            )
            .await
            .expect("Failed to create account");
    }

    println!("Seeding products...");
    ProductRepository::new(db)
        .create(
            tenant.id,
            ProductInput {
                code: "WID-001".to_string(),
                name: "Standard Widget".to_string(),
                description: "Demo stock item".to_string(),
                unit_price: Decimal::new(1999, 2),
                stock_quantity: 100,
            },
        )
        .await
        .expect("Failed to create product");

    println!("Seeding complete!");
    println!("  tenant_id: {}", tenant.id);
    println!("  login:     {DEMO_ADMIN_EMAIL} / {DEMO_ADMIN_PASSWORD}");
}
