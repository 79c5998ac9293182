use std::fmt::Debug;

use anyhow::{Result, anyhow, ensure};
use itertools::Itertools;

use crate::{
    dependent::dependent_pairs_infinite,
    lists::{lists, strings, strings_shortlex},
    permutation::{permutations_finite, prefix_permutations},
    product::{pairs, pairs_logarithmic, pairs_square_root},
    subsets::subsets,
};

/// What a demo is asked to enumerate.
#[derive(Debug, Clone)]
pub struct Request {
    /// How many items to print.
    pub take: usize,
    /// Symbols for list, string and permutation demos.
    pub alphabet: String,
    /// Size of the finite operand in product demos; unbounded when absent.
    pub size: Option<u64>,
}

pub type Demo = fn(&Request) -> Result<String>;

pub static REGISTRY: &[(&str, Demo)] = &[
    ("pairs", demo_pairs),
    ("log-pairs", demo_log_pairs),
    ("sqrt-pairs", demo_sqrt_pairs),
    ("lists", demo_lists),
    ("strings", demo_strings),
    ("shortlex", demo_shortlex),
    ("permutations", demo_permutations),
    ("prefix-permutations", demo_prefix_permutations),
    ("subsets", demo_subsets),
    ("dependent", demo_dependent),
];

pub fn dispatch(id: &str, req: &Request) -> Result<String> {
    let f = REGISTRY
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, f)| *f)
        .ok_or_else(|| {
            anyhow!(
                "unknown demo `{id}`, expected one of: {}",
                REGISTRY.iter().map(|(k, _)| k).join(", ")
            )
        })?;

    let _span = tracing::info_span!("Enumerated", demo = %id, take = req.take).entered();
    f(req)
}

fn render<T: Debug>(items: impl Iterator<Item = T>, take: usize) -> String {
    items
        .take(take)
        .enumerate()
        .map(|(i, x)| format!("{i:>6}  {x:?}"))
        .join("\n")
}

fn symbols(req: &Request) -> Result<Vec<char>> {
    let cs = req.alphabet.chars().collect_vec();
    ensure!(cs.iter().all_unique(), "alphabet `{}` repeats a symbol", req.alphabet);
    Ok(cs)
}

fn operand(req: &Request) -> Box<dyn Iterator<Item = u64>> {
    match req.size {
        Some(n) => Box::new(0..n),
        None => Box::new(0..),
    }
}

fn demo_pairs(req: &Request) -> Result<String> {
    Ok(render(pairs(operand(req), operand(req)), req.take))
}

fn demo_log_pairs(req: &Request) -> Result<String> {
    Ok(render(pairs_logarithmic(operand(req), operand(req)), req.take))
}

fn demo_sqrt_pairs(req: &Request) -> Result<String> {
    Ok(render(pairs_square_root(operand(req), operand(req)), req.take))
}

fn demo_lists(req: &Request) -> Result<String> {
    Ok(render(lists(symbols(req)?), req.take))
}

fn demo_strings(req: &Request) -> Result<String> {
    Ok(render(strings(symbols(req)?), req.take))
}

fn demo_shortlex(req: &Request) -> Result<String> {
    Ok(render(strings_shortlex(symbols(req)?), req.take))
}

fn demo_permutations(req: &Request) -> Result<String> {
    // repeated symbols are the point here, so no uniqueness check
    let perms = permutations_finite(req.alphabet.chars()).map(String::from_iter);
    Ok(render(perms, req.take))
}

fn demo_prefix_permutations(req: &Request) -> Result<String> {
    let width = 8;
    let perms = prefix_permutations(operand(req)).map(|p| p.take(width).collect_vec());
    Ok(render(perms, req.take))
}

fn demo_subsets(req: &Request) -> Result<String> {
    Ok(render(subsets(symbols(req)?), req.take))
}

fn demo_dependent(req: &Request) -> Result<String> {
    // each n paired with the multiples of n
    let pairs = dependent_pairs_infinite(1u64.., |&n| (0u64..).map(move |k| k * n));
    Ok(render(pairs, req.take))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(take: usize, alphabet: &str, size: Option<u64>) -> Request {
        Request {
            take,
            alphabet: alphabet.to_string(),
            size,
        }
    }

    #[test]
    fn test_dispatch_unknown() {
        let err = dispatch("nope", &req(3, "ab", None)).unwrap_err();
        assert!(err.to_string().contains("unknown demo `nope`"));
    }

    #[test]
    fn test_every_demo_runs() {
        for (id, _) in REGISTRY {
            let out = dispatch(id, &req(5, "abc", Some(3))).unwrap();
            assert!(!out.is_empty(), "{id}");
            assert!(out.lines().count() <= 5, "{id}");
        }
    }

    #[test]
    fn test_render() {
        let out = dispatch("shortlex", &req(4, "01", None)).unwrap();
        assert_eq!(
            out.lines().collect_vec(),
            vec![
                "     0  \"\"",
                "     1  \"0\"",
                "     2  \"1\"",
                "     3  \"00\""
            ]
        );
    }

    #[test]
    fn test_repeated_alphabet() {
        assert!(dispatch("lists", &req(3, "aab", None)).is_err());
        let out = dispatch("permutations", &req(10, "aab", None)).unwrap();
        assert_eq!(out.lines().count(), 3);
    }
}
