//! Attach a product, gate a feature and record usage.
//!
//! Reads the secret key from `AUTUMN_SECRET_KEY` (and `AUTUMN_BASE_URL` when
//! set), then runs the attach / check / track flow for one customer.
//!
//! Run with: `cargo run --example quickstart -- user_123 pro messages`

use autumn::models::{AttachParams, CheckParams, TrackParams};
use autumn::{ClientBuilder, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("autumn=debug,quickstart=info")
        .init();

    let mut args = std::env::args().skip(1);
    let customer_id = args.next().unwrap_or_else(|| "user_123".to_string());
    let product_id = args.next().unwrap_or_else(|| "pro".to_string());
    let feature_id = args.next().unwrap_or_else(|| "messages".to_string());

    let client = ClientBuilder::from_env()?.build()?;

    let attached = client
        .attach(&AttachParams::product(&customer_id, &product_id))
        .await?;
    match &attached.checkout_url {
        Some(url) => println!("Payment needed, open {url}"),
        None => println!("Attached {:?} ({})", attached.product_ids, attached.code),
    }

    let check = client
        .check(&CheckParams {
            with_preview: true,
            ..CheckParams::feature(&customer_id, &feature_id)
        })
        .await?;

    if !check.allowed {
        if let Some(preview) = check.feature_preview {
            println!("{}: {}", preview.title, preview.message);
        }
        return Ok(());
    }

    let event = client
        .track(&TrackParams::feature(&customer_id, &feature_id))
        .await?;
    println!("Recorded {} for {}", event.id, event.customer_id);

    match client.customers().get(&customer_id).await {
        Ok(customer) => {
            for (id, feature) in &customer.features {
                println!("  {id}: balance {:?}", feature.balance);
            }
        }
        Err(Error::Http { status, message, .. }) => {
            eprintln!("Could not load customer ({status}): {message}");
        }
        Err(e) => return Err(e),
    }

    client.close().await
}
