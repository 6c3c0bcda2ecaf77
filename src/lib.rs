// src/lib.rs

// 1. Data Structures (The "Nouns")
pub mod models;
pub mod errors;

// 2. Interfaces (The "Contract")
pub mod traits;

// 3. Adapters (The "Plumbing")
pub mod connectors;
pub mod simulation;

// 4. Inventory Aggregation (The "Catalog")
pub mod inventory;

// 5. Retention Rules (The "Brains")
pub mod similarity;
pub mod retention;

// 6. Conversion (The "Hands")
pub mod pipeline;

// 7. Run Orchestration (The "Orchestrator")
pub mod engine;

// 8. Ambient Setup
pub mod config;
pub mod logging;
