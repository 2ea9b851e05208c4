// File: src/core/engine.rs
use crate::config::RecommenderConfig;
use crate::core::apriori::AprioriMiner;
use crate::core::encoder::EncodedTransactions;
use crate::core::popularity::rank_by_popularity;
use crate::core::rules::RuleGenerator;
use crate::core::types::{ItemId, Itemset, Provenance, Recommendation, Rule, Transaction};
use crate::error::{ModelError, QueryError};
use std::sync::{Arc, PoisonError, RwLock};

pub const DEFAULT_TOP_N: usize = 3;

/// Immutable snapshot of everything mined from one transaction history.
/// Built once, wholesale; queries only ever read it.
pub struct Model {
    encoded: EncodedTransactions,
    itemsets: Vec<Itemset>,
    rules: Vec<Rule>,
    popularity: Vec<(ItemId, usize)>,
    fallback_score: f64,
}

impl Model {
    /// Encoder -> miner -> rule generator -> popularity ranker.
    pub fn build(
        transactions: &[Transaction],
        config: &RecommenderConfig,
    ) -> Result<Self, ModelError> {
        let miner = AprioriMiner::new(config.min_support)?;
        let generator = RuleGenerator::new(config.min_confidence)?;
        if !(0.0..=1.0).contains(&config.fallback_score) {
            return Err(ModelError::InvalidThreshold {
                name: "fallback_score",
                value: config.fallback_score,
            });
        }

        let encoded = EncodedTransactions::encode(transactions)?;
        let itemsets = miner.mine(&encoded);
        let rules = generator.generate(&itemsets)?;
        let popularity = rank_by_popularity(&encoded);

        tracing::info!(
            transactions = encoded.transaction_count(),
            items = encoded.catalog().len(),
            itemsets = itemsets.len(),
            rules = rules.len(),
            min_support = config.min_support,
            min_confidence = config.min_confidence,
            "model built"
        );

        Ok(Self {
            encoded,
            itemsets,
            rules,
            popularity,
            fallback_score: config.fallback_score,
        })
    }

    pub fn catalog(&self) -> &[String] {
        self.encoded.catalog()
    }

    pub fn encoded(&self) -> &EncodedTransactions {
        &self.encoded
    }

    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Catalog names with their transaction counts, most popular first.
    pub fn popularity(&self) -> impl Iterator<Item = (&str, usize)> {
        self.popularity
            .iter()
            .map(|&(id, count)| (self.encoded.item_name(id), count))
    }

    pub fn item_names(&self, ids: &[ItemId]) -> Vec<&str> {
        ids.iter().map(|&id| self.encoded.item_name(id)).collect()
    }

    /// Ranks up to `top_n` items the shopper does not hold yet.
    pub fn recommend<S: AsRef<str>>(
        &self,
        selected: &[S],
        top_n: usize,
    ) -> Result<Vec<Recommendation>, QueryError> {
        if selected.is_empty() {
            return Err(QueryError::InvalidSelection);
        }
        if top_n == 0 {
            return Err(QueryError::InvalidTopN);
        }

        // 1. Resolve names against the catalog
        let mut held = vec![false; self.catalog().len()];
        for name in selected {
            let name = name.as_ref();
            let id = self
                .encoded
                .item_id(name)
                .ok_or_else(|| QueryError::InvalidItem {
                    item: name.to_string(),
                })?;
            held[id] = true;
        }

        // 2. Collect consequents of every rule whose antecedent is held,
        //    keeping the best confidence per item
        let mut best: Vec<Option<f64>> = vec![None; held.len()];
        let mut matched = 0usize;
        for rule in &self.rules {
            if !rule.antecedent().iter().all(|&id| held[id]) {
                continue;
            }
            matched += 1;
            for &id in rule.consequent().iter().filter(|&&id| !held[id]) {
                let slot = &mut best[id];
                if slot.map_or(true, |c| rule.confidence > c) {
                    *slot = Some(rule.confidence);
                }
            }
        }

        let mut ranked: Vec<(ItemId, f64)> = best
            .into_iter()
            .enumerate()
            .filter_map(|(id, c)| c.map(|c| (id, c)))
            .collect();

        let fallback = ranked.is_empty();
        tracing::debug!(
            selected = selected.len(),
            matched_rules = matched,
            candidates = ranked.len(),
            fallback,
            "recommendation query"
        );

        // 3. Rank by confidence, or 4. fall back to popularity
        let recommendations = if fallback {
            self.popularity
                .iter()
                .filter(|&&(id, _)| !held[id])
                .take(top_n)
                .map(|&(id, _)| Recommendation {
                    item: self.encoded.item_name(id).to_string(),
                    score: self.fallback_score,
                    provenance: Provenance::Popularity,
                })
                .collect()
        } else {
            // Ids are already in catalog order, so a stable sort settles ties.
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            ranked
                .into_iter()
                .take(top_n)
                .map(|(id, confidence)| Recommendation {
                    item: self.encoded.item_name(id).to_string(),
                    score: confidence,
                    provenance: Provenance::Rule,
                })
                .collect()
        };

        Ok(recommendations)
    }
}

/// Holds the live model and swaps it wholesale on rebuild. Readers take a
/// cheap `Arc` clone and never observe a half-built model.
pub struct SharedModel {
    current: RwLock<Arc<Model>>,
}

impl SharedModel {
    pub fn new(model: Model) -> Self {
        Self {
            current: RwLock::new(Arc::new(model)),
        }
    }

    pub fn snapshot(&self) -> Arc<Model> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, model: Model) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(model);
        tracing::info!("model snapshot replaced");
    }

    /// Builds a fresh model and swaps it in. On error the old snapshot keeps serving.
    pub fn rebuild(
        &self,
        transactions: &[Transaction],
        config: &RecommenderConfig,
    ) -> Result<(), ModelError> {
        let model = Model::build(transactions, config)?;
        self.replace(model);
        Ok(())
    }

    pub fn recommend<S: AsRef<str>>(
        &self,
        selected: &[S],
        top_n: usize,
    ) -> Result<Vec<Recommendation>, QueryError> {
        self.snapshot().recommend(selected, top_n)
    }
}
