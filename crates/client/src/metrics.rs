//! Admin dashboard metrics.
//!
//! Which endpoint serves cart metrics depends on the backend deployment, so
//! acquisition is a strategy list: an ordered set of candidates, tried one
//! at a time, first success wins. Tier one asks for ready-made metrics; tier
//! two fetches every cart and aggregates locally. Candidates are probed
//! sequentially on purpose - firing them in parallel would both break the
//! precedence order and hit endpoints whose answer can no longer matter.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use mercado_core::{Price, ProductId};

use crate::api::ApiClient;
use crate::cart::{PLACEHOLDER_NAME, RawCartItem};

/// Ordered candidates returning ready-made metrics.
pub const DIRECT_METRICS_CANDIDATES: &[&str] = &[
    "/admin/carrinhos/metrics",
    "/carrinhos/metrics",
    "/carrinho/metrics",
];

/// Ordered candidates returning the full cart list.
pub const ALL_CARTS_CANDIDATES: &[&str] = &["/admin/carrinhos", "/carrinhos", "/carrinho/todos"];

/// Ranking length cap.
const RANKING_LIMIT: usize = 10;

/// Reason shown when every candidate came up empty.
const EXHAUSTED_REASON: &str =
    "Could not obtain cart metrics from any known endpoint (check the API's admin routes).";

/// One row of the most-carted ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub product_id: ProductId,
    /// First non-empty display name seen for the product.
    pub name: String,
    /// Total quantity across carts. Always >= 1.
    pub count: u64,
}

impl RankingEntry {
    /// Lenient extraction from a ready-made metrics payload row.
    fn from_payload(value: &Value) -> Option<Self> {
        let product_id = value
            .get("produtoId")
            .or_else(|| value.get("productId"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())?;
        let name = value
            .get("nome")
            .or_else(|| value.get("name"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(PLACEHOLDER_NAME);
        let count = value
            .get("count")
            .and_then(Value::as_u64)
            .unwrap_or(1)
            .max(1);

        Some(Self {
            product_id: ProductId::new(product_id),
            name: name.to_string(),
            count,
        })
    }
}

/// Dashboard metrics in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMetrics {
    /// Distinct owners among carts holding at least one item.
    pub active_users: u64,
    /// Sum of `price * quantity` over every item in every cart.
    pub total_value: Price,
    /// Most-carted products, count descending, at most ten rows.
    pub ranking: Vec<RankingEntry>,
}

impl AdminMetrics {
    /// Lenient extraction from a ready-made metrics payload. Fields the
    /// payload lacks (or mistypes) default rather than fail: the candidate
    /// already won by answering at all.
    fn from_payload(payload: &Value) -> Self {
        Self {
            active_users: payload
                .get("activeUsers")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            total_value: payload
                .get("totalValue")
                .map(Price::coerce)
                .unwrap_or_default(),
            ranking: payload
                .get("ranking")
                .and_then(Value::as_array)
                .map(|rows| {
                    rows.iter()
                        .filter_map(RankingEntry::from_payload)
                        .take(RANKING_LIMIT)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Outcome of metrics acquisition. Exhausting every candidate is a state
/// the dashboard renders, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsOutcome {
    /// Metrics were obtained (directly or computed locally).
    Available(AdminMetrics),
    /// Both tiers came up empty.
    Unavailable {
        /// Human-readable reason for the dashboard.
        reason: String,
    },
}

/// A cart as returned by the all-carts admin endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCart {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default, alias = "usuarioId")]
    pub owner_id: Option<String>,
    #[serde(default, alias = "itens")]
    pub items: Vec<RawCartItem>,
}

/// One candidate fetch. Implemented by [`ApiClient`]; tests substitute a
/// scripted fake to pin down ordering and short-circuit behavior.
pub trait CandidateProbe {
    /// Fetch one candidate path; any failure at all is `None`.
    fn probe(&self, path: &str) -> impl Future<Output = Option<Value>> + Send;
}

impl CandidateProbe for ApiClient {
    fn probe(&self, path: &str) -> impl Future<Output = Option<Value>> + Send {
        self.probe_json(path)
    }
}

/// Acquire dashboard metrics.
///
/// Tier one wins on the first candidate returning a non-empty structured
/// payload; tier two (entered only when tier one is exhausted) wins on the
/// first non-empty cart list, which is then aggregated locally.
#[instrument(skip(probe))]
pub async fn load_dashboard_metrics<P: CandidateProbe>(probe: &P) -> MetricsOutcome {
    for path in DIRECT_METRICS_CANDIDATES {
        let Some(payload) = probe.probe(path).await else {
            continue;
        };
        if is_substantial(&payload) {
            debug!(path, "direct metrics candidate answered");
            return MetricsOutcome::Available(AdminMetrics::from_payload(&payload));
        }
        debug!(path, "candidate returned an empty payload");
    }

    for path in ALL_CARTS_CANDIDATES {
        let Some(payload) = probe.probe(path).await else {
            continue;
        };
        match serde_json::from_value::<Vec<RawCart>>(payload) {
            Ok(carts) if !carts.is_empty() => {
                debug!(path, carts = carts.len(), "aggregating metrics locally");
                return MetricsOutcome::Available(compute_metrics(&carts));
            }
            Ok(_) => debug!(path, "candidate returned an empty cart list"),
            Err(error) => debug!(path, error = %error, "candidate payload was not a cart list"),
        }
    }

    MetricsOutcome::Unavailable {
        reason: EXHAUSTED_REASON.to_string(),
    }
}

/// A payload worth stopping the probe sequence for: a non-empty object or
/// array.
fn is_substantial(payload: &Value) -> bool {
    match payload {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Ranking row under construction, in discovery order.
struct RankingSlot {
    product_id: String,
    name: Option<String>,
    count: u64,
}

/// Aggregate metrics from a full cart list.
///
/// Deterministic: identical inputs produce identical output, with ranking
/// ties resolved by first-discovery order (the sort is stable over the
/// discovery-ordered accumulator).
#[must_use]
pub fn compute_metrics(carts: &[RawCart]) -> AdminMetrics {
    let mut owners: HashSet<&str> = HashSet::new();
    let mut total = Decimal::ZERO;
    let mut slots: Vec<RankingSlot> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for cart in carts {
        // A cart is "active" only when it holds at least one item.
        if cart.items.is_empty() {
            continue;
        }
        if let Some(owner) = cart.owner_id.as_deref().filter(|owner| !owner.is_empty()) {
            owners.insert(owner);
        }

        for item in &cart.items {
            let quantity = item.quantity_or_zero();
            total += item.unit_price() * Decimal::from(quantity);

            let Some(key) = item.product_key() else {
                continue;
            };
            let slot_index = *index.entry(key.to_string()).or_insert_with(|| {
                slots.push(RankingSlot {
                    product_id: key.to_string(),
                    name: None,
                    count: 0,
                });
                slots.len() - 1
            });
            if let Some(slot) = slots.get_mut(slot_index) {
                // An unparsable quantity still proves the item was carted once.
                slot.count += if quantity == 0 { 1 } else { quantity };
                if slot.name.is_none()
                    && let Some(name) = item.display_name()
                {
                    slot.name = Some(name.to_string());
                }
            }
        }
    }

    slots.sort_by(|a, b| b.count.cmp(&a.count));
    slots.truncate(RANKING_LIMIT);

    AdminMetrics {
        active_users: u64::try_from(owners.len()).unwrap_or(u64::MAX),
        total_value: Price::new(total),
        ranking: slots
            .into_iter()
            .map(|slot| RankingEntry {
                product_id: ProductId::new(slot.product_id),
                name: slot.name.unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
                count: slot.count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn carts(value: Value) -> Vec<RawCart> {
        serde_json::from_value(value).expect("cart list")
    }

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    /// Scripted probe: answers only the configured paths, records the order
    /// in which candidates were asked.
    struct ScriptedProbe {
        responses: HashMap<&'static str, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProbe {
        fn new(responses: &[(&'static str, Value)]) -> Self {
            Self {
                responses: responses.iter().cloned().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl CandidateProbe for ScriptedProbe {
        fn probe(&self, path: &str) -> impl Future<Output = Option<Value>> + Send {
            self.calls.lock().expect("lock").push(path.to_string());
            let response = self.responses.get(path).cloned();
            async move { response }
        }
    }

    #[test]
    fn test_compute_metrics_basic() {
        let carts = carts(serde_json::json!([
            {"ownerId": "u1", "items": [
                {"produtoId": "p1", "quantidade": 2, "precoUnitario": 5}
            ]},
            {"ownerId": "u2", "items": []}
        ]));

        let metrics = compute_metrics(&carts);
        assert_eq!(metrics.active_users, 1);
        assert_eq!(metrics.total_value.amount(), dec("10"));
        assert_eq!(metrics.ranking.len(), 1);
        let top = metrics.ranking.first().expect("row");
        assert_eq!(top.product_id, ProductId::new("p1"));
        assert_eq!(top.count, 2);
    }

    #[test]
    fn test_compute_metrics_portuguese_field_names() {
        let carts = carts(serde_json::json!([
            {"usuarioId": "u1", "itens": [
                {"produtoId": "p1", "quantidade": "3", "precoUnitario": "2.5", "nome": "Livro"}
            ]}
        ]));

        let metrics = compute_metrics(&carts);
        assert_eq!(metrics.active_users, 1);
        assert_eq!(metrics.total_value.amount(), dec("7.5"));
        assert_eq!(metrics.ranking.first().map(|r| r.name.as_str()), Some("Livro"));
    }

    #[test]
    fn test_ranking_order_and_tie_break() {
        let carts = carts(serde_json::json!([
            {"ownerId": "u1", "items": [
                {"produtoId": "a", "quantidade": 2},
                {"produtoId": "b", "quantidade": 5},
                {"produtoId": "c", "quantidade": 2}
            ]}
        ]));

        let metrics = compute_metrics(&carts);
        let ids: Vec<&str> = metrics
            .ranking
            .iter()
            .map(|row| row.product_id.as_str())
            .collect();
        // b wins outright; a and c tie at 2 and keep discovery order.
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_ranking_truncates_to_ten() {
        let items: Vec<Value> = (0..15)
            .map(|i| serde_json::json!({"produtoId": format!("p{i}"), "quantidade": i + 1}))
            .collect();
        let carts = carts(serde_json::json!([{"ownerId": "u1", "items": items}]));

        let metrics = compute_metrics(&carts);
        assert_eq!(metrics.ranking.len(), 10);
        // Highest counts survive the cut.
        assert_eq!(
            metrics.ranking.first().map(|row| row.count),
            Some(15)
        );
    }

    #[test]
    fn test_unparsable_quantity_counts_once() {
        let carts = carts(serde_json::json!([
            {"ownerId": "u1", "items": [
                {"produtoId": "p1", "quantidade": "???", "precoUnitario": 5}
            ]}
        ]));

        let metrics = compute_metrics(&carts);
        // Quantity coerces to zero for the total but still proves one carting.
        assert_eq!(metrics.total_value, Price::ZERO);
        assert_eq!(metrics.ranking.first().map(|row| row.count), Some(1));
    }

    #[test]
    fn test_first_non_empty_name_is_kept() {
        let carts = carts(serde_json::json!([
            {"ownerId": "u1", "items": [
                {"produtoId": "p1", "quantidade": 1},
                {"produtoId": "p1", "quantidade": 1, "nome": "Livro"},
                {"produtoId": "p1", "quantidade": 1, "nome": "Outro"}
            ]}
        ]));

        let metrics = compute_metrics(&carts);
        let top = metrics.ranking.first().expect("row");
        assert_eq!(top.name, "Livro");
        assert_eq!(top.count, 3);
    }

    #[test]
    fn test_ownerless_cart_counts_value_but_not_user() {
        let carts = carts(serde_json::json!([
            {"items": [{"produtoId": "p1", "quantidade": 1, "precoUnitario": 4}]}
        ]));

        let metrics = compute_metrics(&carts);
        assert_eq!(metrics.active_users, 0);
        assert_eq!(metrics.total_value.amount(), dec("4"));
    }

    #[tokio::test]
    async fn test_direct_candidate_wins_and_short_circuits() {
        let probe = ScriptedProbe::new(&[(
            "/carrinhos/metrics",
            serde_json::json!({
                "activeUsers": 3,
                "totalValue": 42.5,
                "ranking": [{"produtoId": "p1", "nome": "Livro", "count": 7}]
            }),
        )]);

        let outcome = load_dashboard_metrics(&probe).await;

        let MetricsOutcome::Available(metrics) = outcome else {
            panic!("expected metrics");
        };
        assert_eq!(metrics.active_users, 3);
        assert_eq!(metrics.total_value.amount(), dec("42.5"));
        assert_eq!(metrics.ranking.len(), 1);

        // First candidate failed, second won, nothing after was asked.
        assert_eq!(
            probe.calls(),
            vec!["/admin/carrinhos/metrics", "/carrinhos/metrics"]
        );
    }

    #[tokio::test]
    async fn test_empty_direct_payload_does_not_win() {
        let probe = ScriptedProbe::new(&[
            ("/admin/carrinhos/metrics", serde_json::json!({})),
            (
                "/admin/carrinhos",
                serde_json::json!([
                    {"ownerId": "u1", "items": [{"produtoId": "p1", "quantidade": 2, "precoUnitario": 5}]}
                ]),
            ),
        ]);

        let outcome = load_dashboard_metrics(&probe).await;

        let MetricsOutcome::Available(metrics) = outcome else {
            panic!("expected metrics");
        };
        assert_eq!(metrics.active_users, 1);
        assert_eq!(metrics.total_value.amount(), dec("10"));
    }

    #[tokio::test]
    async fn test_tier_two_fallback_computes_locally() {
        let probe = ScriptedProbe::new(&[(
            "/carrinhos",
            serde_json::json!([
                {"ownerId": "u1", "items": [{"produtoId": "p1", "quantidade": 2, "precoUnitario": 5}]},
                {"ownerId": "u2", "items": []}
            ]),
        )]);

        let outcome = load_dashboard_metrics(&probe).await;

        let MetricsOutcome::Available(metrics) = outcome else {
            panic!("expected metrics");
        };
        assert_eq!(metrics.active_users, 1);
        assert_eq!(metrics.total_value.amount(), dec("10"));
        assert_eq!(
            metrics.ranking,
            vec![RankingEntry {
                product_id: ProductId::new("p1"),
                name: PLACEHOLDER_NAME.to_string(),
                count: 2,
            }]
        );

        // Every direct candidate was tried first, in order.
        assert_eq!(
            probe.calls(),
            vec![
                "/admin/carrinhos/metrics",
                "/carrinhos/metrics",
                "/carrinho/metrics",
                "/admin/carrinhos",
                "/carrinhos",
            ]
        );
    }

    #[tokio::test]
    async fn test_exhausted_probing_is_unavailable_not_error() {
        let probe = ScriptedProbe::new(&[]);

        let outcome = load_dashboard_metrics(&probe).await;

        let MetricsOutcome::Unavailable { reason } = outcome else {
            panic!("expected unavailable");
        };
        assert!(!reason.is_empty());

        let expected: Vec<String> = DIRECT_METRICS_CANDIDATES
            .iter()
            .chain(ALL_CARTS_CANDIDATES)
            .map(|path| (*path).to_string())
            .collect();
        assert_eq!(probe.calls(), expected);
    }

    #[tokio::test]
    async fn test_empty_cart_list_does_not_win() {
        let probe = ScriptedProbe::new(&[
            ("/admin/carrinhos", serde_json::json!([])),
            (
                "/carrinhos",
                serde_json::json!([
                    {"ownerId": "u1", "items": [{"produtoId": "p1", "quantidade": 1}]}
                ]),
            ),
        ]);

        let outcome = load_dashboard_metrics(&probe).await;

        let MetricsOutcome::Available(metrics) = outcome else {
            panic!("expected metrics");
        };
        assert_eq!(metrics.active_users, 1);
    }
}
