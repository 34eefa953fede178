/// Statistics on a [`SymbolTable`](crate::SymbolTable). Serves two purpose:
///
/// * To get partial but quick statistics via `SymbolTable::stats`.
/// * To get full statisics via `SymbolTable::validate`.
#[derive(Default, Debug, Clone)]
pub struct Stats {
    entries: usize,
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    pub(crate) fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    pub(crate) fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    pub(crate) fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number of entries in the table.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including the overhead of colour, subtree
    /// size and child links. Varies with key and value types.
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black links from root to any null link.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics, available only after validation of
    /// a non-empty table.
    pub fn depths(&self) -> Option<&Depth> {
        self.depths.as_ref().filter(|d| d.samples() > 0)
    }
}

/// Depth summarises the depth of every null link in the tree, that is,
/// the length of each root-to-leaf path.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        if self.samples == 0 || depth < self.min {
            self.min = depth
        }
        if depth > self.max {
            self.max = depth
        }
        self.samples += 1;
        self.total += depth;
    }

    /// Number of null links sampled.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Average depth, rounded down. Zero when nothing was sampled.
    pub fn mean(&self) -> usize {
        self.total.checked_div(self.samples).unwrap_or(0)
    }
}
