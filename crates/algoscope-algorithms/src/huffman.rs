//! Huffman coding over an index arena.

use algoscope_trace::{Snapshot, Trace, Tracer};
use serde::{Deserialize, Serialize};

/// One tree node. Children are arena indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanNode {
    /// Set on leaves only.
    pub symbol: Option<char>,
    /// Wider than input counts so merged totals cannot overflow.
    pub frequency: u128,
    pub left: Option<usize>,
    pub right: Option<usize>,
    /// Assigned during the code walk.
    pub code: Option<String>,
}

impl HuffmanNode {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HuffmanEvent {
    /// One leaf per symbol in the working list.
    Start,
    /// The two lowest-frequency nodes taken out of the working list.
    Select { first: usize, second: usize },
    /// New internal node appended to the working list.
    Merge { node: usize, left: usize, right: usize, frequency: u128 },
    /// Post-order walk reached `node` and fixed its code.
    Assign { node: usize, code: String },
    Done,
    #[default]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanStep {
    pub event: HuffmanEvent,
    pub arena: Vec<HuffmanNode>,
    /// Arena indices still waiting to be merged, in list order.
    pub working: Vec<usize>,
    pub root: Option<usize>,
    /// Final codes by symbol, in leaf order.
    pub codes: Vec<(char, String)>,
}

impl HuffmanStep {
    /// Encoded length in bits of the whole input under the final codes.
    pub fn encoded_bits(&self) -> u128 {
        encoded_bits(&self.arena)
    }
}

fn encoded_bits(arena: &[HuffmanNode]) -> u128 {
    arena
        .iter()
        .filter(|n| n.symbol.is_some())
        .map(|n| n.frequency.saturating_mul(n.code.as_ref().map_or(0, |c| c.len() as u128)))
        .fold(0, u128::saturating_add)
}

impl Snapshot for HuffmanStep {
    type State = HuffmanStep;

    fn snapshot(&self) -> &Self::State {
        self
    }
}

algoscope_trace::replay_by_snapshot!(HuffmanStep);

/// Symbol frequencies in order of first appearance.
pub fn frequencies(text: &str) -> Vec<(char, u64)> {
    let mut counts: Vec<(char, u64)> = Vec::new();
    for c in text.chars() {
        match counts.iter_mut().find(|(symbol, _)| *symbol == c) {
            Some((_, count)) => *count += 1,
            None => counts.push((c, 1)),
        }
    }
    counts
}

struct Builder {
    tracer: Tracer<HuffmanStep>,
    arena: Vec<HuffmanNode>,
    working: Vec<usize>,
    root: Option<usize>,
    codes: Vec<(char, String)>,
}

impl Builder {
    fn record(&mut self, description: String, event: HuffmanEvent) {
        self.tracer.record(
            description,
            HuffmanStep {
                event,
                arena: self.arena.clone(),
                working: self.working.clone(),
                root: self.root,
                codes: self.codes.clone(),
            },
        );
    }

    /// Remove and return the lowest-frequency node, earliest in the list on
    /// ties.
    fn take_min(&mut self) -> Option<usize> {
        let position = self
            .working
            .iter()
            .enumerate()
            .min_by_key(|&(position, &node)| (self.arena[node].frequency, position))
            .map(|(position, _)| position)?;
        Some(self.working.remove(position))
    }

    fn name(&self, node: usize) -> String {
        let n = &self.arena[node];
        match n.symbol {
            Some(symbol) => format!("'{symbol}' ({})", n.frequency),
            None => format!("#{node} ({})", n.frequency),
        }
    }

    /// Post-order walk from `root`: children first, then the node itself.
    fn assign(&mut self, root: usize) {
        let mut stack = vec![(root, String::new(), false)];
        while let Some((node, prefix, expanded)) = stack.pop() {
            let (left, right) = (self.arena[node].left, self.arena[node].right);
            if !expanded && !self.arena[node].is_leaf() {
                stack.push((node, prefix.clone(), true));
                if let Some(right) = right {
                    stack.push((right, format!("{prefix}1"), false));
                }
                if let Some(left) = left {
                    stack.push((left, format!("{prefix}0"), false));
                }
                continue;
            }
            self.assign_code(node, prefix);
        }
    }

    fn assign_code(&mut self, node: usize, prefix: String) {
        let code = if self.arena[node].is_leaf() && prefix.is_empty() {
            "0".to_string()
        } else {
            prefix
        };
        self.arena[node].code = Some(code.clone());
        let description = match self.arena[node].symbol {
            Some(symbol) => {
                self.codes.push((symbol, code.clone()));
                format!("'{symbol}' gets code {code}")
            }
            None if code.is_empty() => "Root has the empty prefix".to_string(),
            None => format!("Internal node #{node} has prefix {code}"),
        };
        self.record(description, HuffmanEvent::Assign { node, code });
    }
}

/// Trace Huffman tree construction and code assignment.
///
/// Leaves enter the working list in input order; merged nodes are appended
/// to its end. Each round takes the lowest-frequency node twice, earliest
/// list position first on ties, and the first one taken becomes the left
/// child. Codes come from a post-order walk, `0` left and `1` right; a
/// lone symbol gets `"0"`.
pub fn huffman(symbols: &[(char, u64)]) -> Trace<HuffmanStep> {
    let mut builder = Builder {
        tracer: Tracer::new("huffman"),
        arena: Vec::with_capacity(symbols.len() * 2),
        working: Vec::with_capacity(symbols.len()),
        root: None,
        codes: Vec::with_capacity(symbols.len()),
    };

    if symbols.is_empty() {
        builder.record("No symbols: there is nothing to encode".to_string(), HuffmanEvent::Empty);
        return builder.tracer.finish();
    }

    for &(symbol, frequency) in symbols {
        builder.working.push(builder.arena.len());
        builder.arena.push(HuffmanNode {
            symbol: Some(symbol),
            frequency: u128::from(frequency),
            ..Default::default()
        });
    }
    builder.record(
        format!("Start with {} leaves in the working list", symbols.len()),
        HuffmanEvent::Start,
    );

    while builder.working.len() > 1 {
        let (Some(first), Some(second)) = (builder.take_min(), builder.take_min()) else {
            break;
        };
        let description = format!(
            "Take the two lowest: {} and {}",
            builder.name(first),
            builder.name(second)
        );
        builder.record(description, HuffmanEvent::Select { first, second });

        let frequency = builder.arena[first].frequency + builder.arena[second].frequency;
        let node = builder.arena.len();
        builder.arena.push(HuffmanNode {
            symbol: None,
            frequency,
            left: Some(first),
            right: Some(second),
            code: None,
        });
        builder.working.push(node);
        builder.record(
            format!("Merge them into #{node} with frequency {frequency}"),
            HuffmanEvent::Merge {
                node,
                left: first,
                right: second,
                frequency,
            },
        );
    }

    let root = builder.working[0];
    builder.root = Some(root);
    builder.assign(root);

    let bits = encoded_bits(&builder.arena);
    builder.record(
        format!("Done: {} symbols encode to {bits} bits", symbols.len()),
        HuffmanEvent::Done,
    );
    tracing::debug!(symbols = symbols.len(), bits, "huffman traced");
    builder.tracer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn codes(trace: &Trace<HuffmanStep>) -> HashMap<char, String> {
        trace.last().payload.codes.iter().cloned().collect()
    }

    #[test]
    fn frequencies_keep_first_appearance_order() {
        assert_eq!(frequencies("abracadabra"), vec![('a', 5), ('b', 2), ('r', 2), ('c', 1), ('d', 1)]);
    }

    #[test]
    fn classic_example() {
        let trace = huffman(&[('a', 5), ('b', 9), ('c', 12), ('d', 13), ('e', 16), ('f', 45)]);
        let codes = codes(&trace);

        assert_eq!(codes[&'f'], "0");
        assert_eq!(codes[&'c'], "100");
        assert_eq!(codes[&'d'], "101");
        assert_eq!(codes[&'a'], "1100");
        assert_eq!(codes[&'b'], "1101");
        assert_eq!(codes[&'e'], "111");
        assert_eq!(trace.last().payload.encoded_bits(), 224);
    }

    #[test]
    fn ties_take_the_earliest_list_position() {
        let trace = huffman(&[('x', 1), ('y', 1), ('z', 1)]);
        let selects: Vec<_> = trace
            .iter()
            .filter_map(|s| match s.payload.event {
                HuffmanEvent::Select { first, second } => Some((first, second)),
                _ => None,
            })
            .collect();
        // x and y merge into #3, which is appended after z.
        assert_eq!(selects, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn codes_are_prefix_free() {
        let trace = huffman(&frequencies("mississippi river"));
        let codes: Vec<String> = codes(&trace).into_values().collect();
        for a in &codes {
            for b in &codes {
                if a != b {
                    assert!(!b.starts_with(a.as_str()), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn single_symbol_gets_zero() {
        let trace = huffman(&[('q', 7)]);
        assert_eq!(codes(&trace)[&'q'], "0");
        assert_eq!(trace.last().payload.root, Some(0));
    }

    #[test]
    fn empty_input_is_one_step() {
        let trace = huffman(&[]);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.last().payload.event, HuffmanEvent::Empty);
    }

    #[test]
    fn huge_frequencies_do_not_overflow() {
        let trace = huffman(&[('a', u64::MAX), ('b', u64::MAX), ('c', 1)]);
        let last = &trace.last().payload;
        let root = last.root.unwrap();
        assert_eq!(last.arena[root].frequency, 2 * u128::from(u64::MAX) + 1);
        assert!(trace.iter().any(|s| matches!(
            s.payload.event,
            HuffmanEvent::Merge { frequency, .. } if frequency == u128::from(u64::MAX) + 1
        )));
        // b = "0", c = "10", a = "11"
        assert_eq!(last.encoded_bits(), 3 * u128::from(u64::MAX) + 2);
    }

    #[test]
    fn merges_shrink_the_working_list() {
        let trace = huffman(&frequencies("hello world"));
        let merges = trace
            .iter()
            .filter(|s| matches!(s.payload.event, HuffmanEvent::Merge { .. }))
            .count();
        assert_eq!(merges, frequencies("hello world").len() - 1);
        assert_eq!(trace.last().payload.working.len(), 1);
    }
}
