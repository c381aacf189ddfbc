//! Dynamic persistence: incremental mod-2 boundary reduction with cycle and
//! chain tracking.
//!
//! Simplices are processed once, in filtration order. For the simplex at
//! position `i` the engine keeps two columns:
//! - `R`: its boundary, reduced against earlier death columns;
//! - `V`: the set of simplices whose boundaries were summed to obtain `R`.
//!
//! While `low(R)` is the pivot of an earlier death column `j`, the engine adds
//! `R_j` to `R` and `V_j` to `V`. When this stops, either `R` is empty and
//! `V` is a new cycle (a birth), or `low(R)` is an unpaired birth simplex
//! `τ`, which `i` now kills: `R` is the cycle that dies and `V` the chain it
//! bounds.
//!
//! Per-simplex state is an explicit tagged value ([`SimplexState`]) held in a
//! single owned `EngineState`; after the pass every simplex is either
//! [`SimplexState::Paired`] or [`SimplexState::Essential`] and the result is
//! read-only. The pass cannot be interrupted: callers may stop between
//! pipeline stages, not inside a reduction.

use crate::algs::chain::Chain;
use crate::algs::diagram::{PersistenceDiagram, PersistencePair};
use crate::algs::simplex_map::SimplexMap;
use crate::debug_invariants::DebugInvariants;
use crate::persistence_error::PersistenceError;
use crate::topology::filtration::Filtration;
use crate::topology::simplex::Simplex;

/// Role of a simplex in its pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Sign {
    /// Creates a homology class.
    Positive,
    /// Destroys the class created by its partner.
    Negative,
}

/// Processing state of one filtration position.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SimplexState {
    /// Not reached by the reduction yet.
    Unprocessed,
    /// Positive and not yet killed. `cycle` is the `V` column whose boundary vanished.
    Active { cycle: Chain },
    /// Matched with `partner`.
    ///
    /// For a positive simplex `cycle` is the cycle it created and `chain`
    /// is empty. For a negative simplex `cycle` is its reduced boundary
    /// (the cycle it kills) and `chain` is the `V` column whose boundary
    /// equals that cycle.
    Paired {
        partner: usize,
        sign: Sign,
        cycle: Chain,
        chain: Chain,
    },
    /// Positive and never killed within the filtration.
    Essential { cycle: Chain },
}

impl SimplexState {
    /// `Some(Positive)` for births, `Some(Negative)` for deaths, `None` while unprocessed.
    pub fn sign(&self) -> Option<Sign> {
        match self {
            SimplexState::Unprocessed => None,
            SimplexState::Active { .. } | SimplexState::Essential { .. } => Some(Sign::Positive),
            SimplexState::Paired { sign, .. } => Some(*sign),
        }
    }

    pub fn partner(&self) -> Option<usize> {
        match self {
            SimplexState::Paired { partner, .. } => Some(*partner),
            _ => None,
        }
    }

    pub fn cycle(&self) -> Option<&Chain> {
        match self {
            SimplexState::Unprocessed => None,
            SimplexState::Active { cycle }
            | SimplexState::Essential { cycle }
            | SimplexState::Paired { cycle, .. } => Some(cycle),
        }
    }

    pub fn chain(&self) -> Option<&Chain> {
        match self {
            SimplexState::Paired { chain, .. } => Some(chain),
            _ => None,
        }
    }
}

/// Mutable bookkeeping for a single reduction pass.
struct EngineState {
    states: Vec<SimplexState>,
    /// `pivots[τ] = σ` when death column `σ` has `low = τ`.
    pivots: Vec<Option<usize>>,
}

impl EngineState {
    fn new(n: usize) -> Self {
        Self {
            states: vec![SimplexState::Unprocessed; n],
            pivots: vec![None; n],
        }
    }

    /// Reduce the column of `i` against earlier death columns.
    fn reduce(&self, i: usize, mut r: Chain) -> (Chain, Chain) {
        let mut v = Chain::singleton(i);
        while let Some(low) = r.low() {
            let Some(j) = self.pivots[low] else { break };
            match &self.states[j] {
                SimplexState::Paired { cycle, chain, .. } => {
                    r += cycle;
                    v += chain;
                }
                other => unreachable!("pivot column {j} is not a death: {other:?}"),
            }
        }
        (r, v)
    }

    fn process(&mut self, filtration: &Filtration, i: usize) -> Result<(), PersistenceError> {
        let faces = filtration.boundary_indices(i)?;
        if let Some(&face) = faces.iter().find(|&&f| f >= i) {
            return Err(PersistenceError::MalformedFiltration { simplex: i, face });
        }

        let (r, v) = self.reduce(i, Chain::from_indices(faces));
        let Some(low) = r.low() else {
            self.states[i] = SimplexState::Active { cycle: v };
            return Ok(());
        };

        let born_cycle = match std::mem::replace(&mut self.states[low], SimplexState::Unprocessed) {
            SimplexState::Active { cycle } => cycle,
            // low(R) of a fully reduced column is always an unpaired birth.
            other => {
                self.states[low] = other;
                return Err(PersistenceError::InvariantViolation {
                    simplex: i,
                    face: low,
                });
            }
        };
        self.states[low] = SimplexState::Paired {
            partner: i,
            sign: Sign::Positive,
            cycle: born_cycle,
            chain: Chain::new(),
        };
        self.states[i] = SimplexState::Paired {
            partner: low,
            sign: Sign::Negative,
            cycle: r,
            chain: v,
        };
        self.pivots[low] = Some(i);
        Ok(())
    }

    fn finish(mut self) -> Vec<SimplexState> {
        for state in &mut self.states {
            if let SimplexState::Active { cycle } = state {
                *state = SimplexState::Essential {
                    cycle: std::mem::take(cycle),
                };
            }
        }
        self.states
    }
}

/// Frozen result of [`pair_simplices`] over a borrowed filtration.
#[derive(Clone, Debug)]
pub struct DynamicPersistence<'f> {
    filtration: &'f Filtration,
    states: Vec<SimplexState>,
}

/// Pair every simplex of a sorted filtration.
///
/// # Errors
/// * [`PersistenceError::UnsortedFiltration`] if `filtration` is not sorted.
/// * [`PersistenceError::MissingFace`] if a boundary face is absent.
/// * [`PersistenceError::MalformedFiltration`] if a face index is not below
///   its coface index. This is fatal: any pairing computed past it would be wrong.
pub fn pair_simplices(filtration: &Filtration) -> Result<DynamicPersistence<'_>, PersistenceError> {
    if !filtration.is_sorted() {
        return Err(PersistenceError::UnsortedFiltration);
    }
    let mut engine = EngineState::new(filtration.len());
    for i in 0..filtration.len() {
        engine.process(filtration, i)?;
    }
    let dp = DynamicPersistence {
        filtration,
        states: engine.finish(),
    };
    dp.debug_assert_invariants();
    Ok(dp)
}

impl<'f> DynamicPersistence<'f> {
    /// Same as [`pair_simplices`].
    pub fn new(filtration: &'f Filtration) -> Result<Self, PersistenceError> {
        pair_simplices(filtration)
    }

    pub fn filtration(&self) -> &'f Filtration {
        self.filtration
    }

    /// Number of processed simplices (equals the filtration length).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State of the simplex at filtration position `i`.
    pub fn state(&self, i: usize) -> Option<&SimplexState> {
        self.states.get(i)
    }

    pub fn states(&self) -> &[SimplexState] {
        &self.states
    }

    /// Partner position, or `None` for essential simplices.
    pub fn partner(&self, i: usize) -> Option<usize> {
        self.states.get(i).and_then(SimplexState::partner)
    }

    pub fn sign(&self, i: usize) -> Option<Sign> {
        self.states.get(i).and_then(SimplexState::sign)
    }

    pub fn is_essential(&self, i: usize) -> bool {
        matches!(self.states.get(i), Some(SimplexState::Essential { .. }))
    }

    /// `(birth, death)` positions of all finite pairs, by death position.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.states.iter().enumerate().filter_map(|(i, s)| match s {
            SimplexState::Paired {
                partner,
                sign: Sign::Negative,
                ..
            } => Some((*partner, i)),
            _ => None,
        })
    }

    /// Positions of essential simplices, increasing.
    pub fn essentials(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, SimplexState::Essential { .. }))
            .map(|(i, _)| i)
    }

    /// Number of essential classes per homology dimension.
    pub fn essential_counts(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for i in self.essentials() {
            let d = self.filtration.simplex(i).dimension();
            if counts.len() <= d {
                counts.resize(d + 1, 0);
            }
            counts[d] += 1;
        }
        counts
    }

    /// Lookup from positions back to simplices and values.
    pub fn make_simplex_map(&self) -> SimplexMap<'f> {
        SimplexMap::new(self.filtration)
    }

    /// Resolve a chain to the simplices at its positions.
    pub fn resolve(&self, chain: &Chain) -> Vec<Simplex> {
        chain
            .iter()
            .map(|i| self.filtration.simplex(i).clone())
            .collect()
    }

    /// Owned diagram with values and geometric representatives.
    ///
    /// Finite pairs take the killed cycle and bounding chain from the
    /// negative simplex. Essential classes take the cycle born at their
    /// simplex and an empty chain.
    pub fn diagram(&self) -> PersistenceDiagram {
        let f = self.filtration;
        let mut pairs = Vec::new();
        for (i, state) in self.states.iter().enumerate() {
            match state {
                SimplexState::Paired {
                    partner,
                    sign: Sign::Negative,
                    cycle,
                    chain,
                } => pairs.push(PersistencePair {
                    dimension: f.simplex(*partner).dimension(),
                    birth: f.value(*partner),
                    death: Some(f.value(i)),
                    birth_index: *partner,
                    death_index: Some(i),
                    cycle: self.resolve(cycle),
                    chain: self.resolve(chain),
                }),
                SimplexState::Essential { cycle } => pairs.push(PersistencePair {
                    dimension: f.simplex(i).dimension(),
                    birth: f.value(i),
                    death: None,
                    birth_index: i,
                    death_index: None,
                    cycle: self.resolve(cycle),
                    chain: Vec::new(),
                }),
                _ => {}
            }
        }
        PersistenceDiagram::new(pairs)
    }
}

impl DebugInvariants for DynamicPersistence<'_> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "DynamicPersistence");
    }

    /// Pairing is a symmetric matching between a positive and a later negative
    /// simplex one dimension higher, and nothing is left unprocessed or active.
    fn validate_invariants(&self) -> Result<(), PersistenceError> {
        let f = self.filtration;
        for (i, state) in self.states.iter().enumerate() {
            match state {
                SimplexState::Unprocessed | SimplexState::Active { .. } => {
                    return Err(PersistenceError::InvariantViolation {
                        simplex: i,
                        face: i,
                    });
                }
                SimplexState::Essential { .. } => {}
                SimplexState::Paired { partner, sign, .. } => {
                    let back = self.partner(*partner);
                    let (birth, death) = match sign {
                        Sign::Positive => (i, *partner),
                        Sign::Negative => (*partner, i),
                    };
                    if back != Some(i)
                        || birth >= death
                        || f.simplex(death).dimension() != f.simplex(birth).dimension() + 1
                        || f.value(birth) > f.value(death)
                    {
                        return Err(PersistenceError::InvariantViolation {
                            simplex: death,
                            face: birth,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(vs: &[u32]) -> Simplex {
        Simplex::new(vs.iter().copied()).unwrap()
    }

    /// Hollow triangle 0-1-2 filled at value 3.
    fn filled_triangle() -> Filtration {
        let mut f = Filtration::new();
        for v in 0..3 {
            f.append(s(&[v]), 0.0);
        }
        f.append(s(&[0, 1]), 1.0);
        f.append(s(&[1, 2]), 1.0);
        f.append(s(&[0, 2]), 2.0);
        f.append(s(&[0, 1, 2]), 3.0);
        f.sort().unwrap();
        f
    }

    #[test]
    fn triangle_pairs() {
        let f = filled_triangle();
        let dp = pair_simplices(&f).unwrap();
        // Order: [0] [1] [2] [0,1] [1,2] [0,2] [0,1,2]
        let pairs: Vec<_> = dp.pairs().collect();
        assert_eq!(pairs, vec![(1, 3), (2, 4), (5, 6)]);
        assert_eq!(dp.essentials().collect::<Vec<_>>(), vec![0]);
        assert_eq!(dp.sign(5), Some(Sign::Positive));
        assert_eq!(dp.sign(6), Some(Sign::Negative));
        assert_eq!(dp.partner(5), Some(6));
        assert_eq!(dp.essential_counts(), vec![1]);
        dp.validate_invariants().unwrap();
    }

    #[test]
    fn loop_cycle_and_chain() {
        let f = filled_triangle();
        let dp = pair_simplices(&f).unwrap();
        // The loop born at [0,2] is the three edges; it dies bounding the triangle.
        let born = dp.state(5).unwrap();
        assert_eq!(born.cycle().unwrap().as_slice(), &[3, 4, 5]);
        let death = dp.state(6).unwrap();
        assert_eq!(death.cycle().unwrap().as_slice(), &[3, 4, 5]);
        assert_eq!(death.chain().unwrap().as_slice(), &[6]);

        // Edge [1,2] kills vertex 2; the cycle it kills is its boundary.
        let edge = dp.state(4).unwrap();
        assert_eq!(edge.cycle().unwrap().as_slice(), &[1, 2]);
    }

    #[test]
    fn reduction_adds_earlier_columns() {
        // Path 0-1-2 then edge [0,2] closes a loop; components merge by
        // adding earlier death columns.
        let mut f = Filtration::new();
        for v in 0..3 {
            f.append(s(&[v]), 0.0);
        }
        f.append(s(&[0, 1]), 1.0);
        f.append(s(&[0, 2]), 1.5);
        f.append(s(&[1, 2]), 2.0);
        f.sort().unwrap();
        let dp = pair_simplices(&f).unwrap();
        // [1,2] reduces to zero: boundary {1,2} + {0,2} + {0,1} = 0.
        let st = dp.state(5).unwrap();
        assert!(matches!(st, SimplexState::Essential { .. }));
        assert_eq!(st.cycle().unwrap().as_slice(), &[3, 4, 5]);
    }

    #[test]
    fn face_after_coface_is_malformed() {
        let f = Filtration::with_order_unchecked(vec![
            (s(&[0]), 0.0),
            (s(&[0, 1]), 1.0),
            (s(&[1]), 0.0),
        ]);
        assert_eq!(
            pair_simplices(&f).unwrap_err(),
            PersistenceError::MalformedFiltration { simplex: 1, face: 2 }
        );
    }

    #[test]
    fn unsorted_filtration_is_rejected() {
        let mut f = Filtration::new();
        f.append(s(&[0]), 0.0);
        assert_eq!(
            pair_simplices(&f).unwrap_err(),
            PersistenceError::UnsortedFiltration
        );
    }

    #[test]
    fn diagram_values() {
        let f = filled_triangle();
        let dp = pair_simplices(&f).unwrap();
        let diagram = dp.diagram();
        assert_eq!(diagram.len(), 4);
        let h1: Vec<_> = diagram.dimension(1).collect();
        assert_eq!(h1.len(), 1);
        assert_eq!(h1[0].birth, 2.0);
        assert_eq!(h1[0].death, Some(3.0));
        assert_eq!(h1[0].cycle, vec![s(&[0, 1]), s(&[1, 2]), s(&[0, 2])]);
        assert_eq!(h1[0].chain, vec![s(&[0, 1, 2])]);
    }
}
