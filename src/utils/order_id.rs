use chrono::Utc;

/// Synthetic gateway order id: embeds the donation id so the webhook can
/// recover it, plus a timestamp so retried sessions get distinct ids.
pub fn build_order_id(donation_id: i64) -> String {
    format!("DONASI-{}-{}", donation_id, Utc::now().timestamp())
}

/// Extracts the donation id from an order id of the form
/// `DONASI-{id}-{ts}`. Returns None for anything else.
pub fn parse_order_id(order_id: &str) -> Option<i64> {
    let rest = order_id.strip_prefix("DONASI-")?;
    let (id, _ts) = rest.split_once('-')?;
    id.parse::<i64>().ok()
}
