//! Bill lookup walkthrough
//!
//! Logs at debug level so each resolution tier shows up in the output.

use billcheck_core::{
    utils::JsonSource, BillingService, IdentifierClass, LookupError, ServiceConfig,
    DEFAULT_HISTORY_MONTHS,
};

const DATASET: &str = r#"[
    {
        "consumerId": "1234567890",
        "billingMonth": "2024-05-01",
        "dueDate": "2024-05-25",
        "billAmount": "980.00",
        "totalAmount": "1156.40",
        "unitsConsumed": 210,
        "meterReading": 5120,
        "status": "paid"
    },
    {
        "consumerId": "987654321098",
        "billingMonth": "2024-05-01",
        "dueDate": "2024-05-25",
        "billAmount": "1450.50",
        "totalAmount": "1711.59",
        "unitsConsumed": 320,
        "meterReading": 8800,
        "status": "unpaid"
    }
]"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(true)
        .init();

    println!("=== Bill Lookup Demo ===\n");

    let service = BillingService::load(&JsonSource::new(DATASET), ServiceConfig::default()).await?;
    println!("Loaded {} bills\n", service.store().len());

    // 1. Lookups with formatting noise and typos
    println!("1. Looking up bills...");
    for input in ["9876 5432 1098", "1234-567-891", "12345", "5555555555"] {
        match service.lookup_by_consumer_identifier(input) {
            Ok(bill) => println!(
                "   {:<16} -> {} | {} | ₹{} | {}",
                input,
                bill.consumer_identifier,
                bill.billing_month.format("%b %Y"),
                bill.total_amount,
                bill.status
            ),
            Err(LookupError::NotFound(query)) => {
                println!("   {:<16} -> no bill found for {}", input, query)
            }
            Err(e) => println!("   {:<16} -> {}", input, e),
        }
    }

    // 2. Reference numbers
    println!("\n2. Looking up by reference number...");
    let bill = service.lookup_by_reference_number("REF-5432-1098")?;
    println!("   REF-5432-1098    -> {}", bill.consumer_identifier);

    // 3. Form validation
    println!("\n3. Validating input...");
    for input in ["", "98765 43210", "98765x43210"] {
        let report = service.validate_identifier(input, IdentifierClass::ConsumerIdentifier);
        println!("   {:<16} -> valid={} ({})", format!("{:?}", input), report.valid, report.message);
    }

    // 4. History
    println!("\n4. Bill history...");
    let history = service.fetch_history(
        "987654321098",
        IdentifierClass::ConsumerIdentifier,
        DEFAULT_HISTORY_MONTHS,
    )?;
    for bill in &history {
        println!(
            "   {} | due {} | {:>4} units | meter {:>5} | ₹{:>9} | {}",
            bill.billing_month.format("%b %Y"),
            bill.due_date,
            bill.units_consumed,
            bill.meter_reading,
            bill.total_amount,
            bill.status
        );
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
