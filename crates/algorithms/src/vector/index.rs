//! R-tree over feature envelopes

use geoprocs_core::vector::{Envelope, FeatureCollection};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

type Entry = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Envelope index over the features of a collection.
///
/// Query results are feature indices in ascending order. Features without
/// geometry (or with an empty one) are not indexed.
pub struct EnvelopeIndex {
    tree: RTree<Entry>,
}

fn aabb(env: &Envelope) -> AABB<[f64; 2]> {
    AABB::from_corners([env.min_x, env.min_y], [env.max_x, env.max_y])
}

impl EnvelopeIndex {
    pub fn build(features: &FeatureCollection) -> Self {
        let entries: Vec<Entry> = features
            .iter()
            .enumerate()
            .filter_map(|(idx, f)| {
                let env = Envelope::from_geometry(f.geometry.as_ref()?)?;
                Some(GeomWithData::new(
                    Rectangle::from_corners([env.min_x, env.min_y], [env.max_x, env.max_y]),
                    idx,
                ))
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Indices of features whose envelope intersects `env`
    pub fn candidates(&self, env: &Envelope) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&aabb(env))
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
