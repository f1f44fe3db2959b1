//! Web server for browser-based deck matching.
//!
//! This module provides an interactive web interface using Axum.
//! Users paste or pick their owned cards and get the matching decks.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! deck-solver serve
//!
//! # Custom port and auto-open browser
//! deck-solver serve --port 3000 --open
//!
//! # Serve local data files
//! deck-solver serve --catalog cards.csv --solutions solutions.json
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Main page with the card ID input and picker
//! - `POST /api/calculate` - Match owned cards (JSON body `{"ids": "1,2,3"}`)
//! - `GET /api/cards` - List catalog cards (`?high_rarity_only=true` hides N/R)

pub mod server;
