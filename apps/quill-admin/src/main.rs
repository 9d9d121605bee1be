//! quill-admin - administrative console for the Quill blog.
//!
//! Approval is only ever granted from here; the web surface can merely
//! reset it.
//!
//! ```bash
//! # What is waiting for review?
//! quill-admin pending
//!
//! # Publish (or unpublish) by id or slug
//! quill-admin approve my-first-post
//! quill-admin revoke 2b0c8a4e-5d0f-4a55-9a53-6f1f3f3b7a10
//!
//! # Accounts
//! quill-admin create-user --username ada --email ada@example.com --password '...' --staff
//! quill-admin set-staff bob --revoke
//! ```

mod commands;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(err) = commands::run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
