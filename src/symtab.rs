use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    iter::FromIterator,
    mem,
    ops::{Deref, DerefMut},
};

use log::{debug, trace};

use crate::error::Error;
use crate::stats::{Depth, Stats};

/// SymbolTable maps unique, ordered keys to values using a
/// [left-leaning-red-black][llrb] tree. Every node caches the size of
/// its subtree, which makes [`rank`](SymbolTable::rank) and
/// [`select`](SymbolTable::select) logarithmic.
///
/// The table is single-owner and not thread safe. Wrap it in a lock
/// for shared access.
///
/// ```
/// use llrb_symtab::SymbolTable;
///
/// let mut table: SymbolTable<i64, &str> = SymbolTable::new();
/// table.insert(5, "five");
/// table.insert(3, "three");
/// table.insert(8, "eight");
///
/// assert_eq!(table.search(&3), Some("three"));
/// assert_eq!(table.rank(&8), Some(2));
/// assert_eq!(table.select(0), Some(3));
/// assert_eq!(table.range_by_rank(1, 2), vec![5, 8]);
/// ```
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
#[derive(Clone)]
pub struct SymbolTable<K, V> {
    root: Option<Box<Node<K, V>>>,
}

/// Different ways to construct a new SymbolTable instance.
impl<K, V> SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Create an empty table.
    pub fn new() -> SymbolTable<K, V> {
        SymbolTable {
            root: Default::default(),
        }
    }
}

impl<K, V> Default for SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl<K, V> FromIterator<(K, V)> for SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Load entries from `iter`, later duplicates overwrite earlier ones.
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut table = SymbolTable::new();
        table.extend(iter);
        table
    }
}

impl<K, V> Extend<(K, V)> for SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Maintenance API.
impl<K, V> SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Return number of entries in this table.
    #[inline]
    pub fn len(&self) -> usize {
        size(self.root.as_deref())
    }

    /// Check whether this table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return the root node, for diagnostics.
    #[inline]
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// Return the height of the tree, `-1` for an empty table and `0`
    /// for a table with a single entry. Computed by walking every node.
    pub fn height(&self) -> isize {
        height(self.root.as_deref())
    }

    /// Return quickly with basic statisics, only entries() and
    /// node_size() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Node<K, V>>())
    }

    /// Validate LLRB tree with following rules:
    ///
    /// * Keys are in sort order, across the whole tree.
    /// * Red links lean left.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Cached subtree sizes are exact.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>> {
        let root = self.root.as_deref();
        let mut stats = self.stats();
        let mut depths = Depth::new();
        let blacks = validate_tree(root, is_red(root), 0, 0, (None, None), &mut depths)?;
        stats.set_blacks(blacks);
        stats.set_depths(depths);
        Ok(stats)
    }
}

type Delete<K, V> = (Option<Box<Node<K, V>>>, Option<V>);

type Delmin<K, V> = (Option<Box<Node<K, V>>>, Option<(K, V)>);

/// Write operations on SymbolTable instance.
impl<K, V> SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (mut root, old_value) = Self::do_insert(self.root.take(), key, value);
        root.set_black();
        self.root = Some(root);
        old_value
    }

    /// Delete key from this table and return its value. Deleting a
    /// missing key leaves the table untouched and returns
    /// [`Error::NotFound`].
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V, Error<K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // the top-down descent reshapes nodes before it reaches the
        // key, so it must not start for a missing key.
        if !self.contains(key) {
            debug!("delete: key not present in {} entries", self.len());
            return Err(Error::NotFound);
        }

        let (root, old_value) = Self::do_delete(self.redden_root(), key);
        self.reroot(root);
        old_value.ok_or(Error::NotFound)
    }

    /// Remove the smallest entry and return it. Return None if the
    /// table is empty.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            debug!("delete_min: empty table");
            return None;
        }

        let (root, entry) = Self::do_delete_min(self.redden_root());
        self.reroot(root);
        entry
    }

    // Detach the root, coloured red when both its children are black,
    // so that the push-down helpers find their precondition at the top.
    fn redden_root(&mut self) -> Option<Box<Node<K, V>>> {
        let mut root = self.root.take();
        if let Some(node) = root.as_mut() {
            if !is_red(node.left_deref()) && !is_red(node.right_deref()) {
                node.set_red();
            }
        }
        root
    }

    fn reroot(&mut self, root: Option<Box<Node<K, V>>>) {
        self.root = root.map(|mut root| {
            root.set_black();
            root
        });
    }
}

/// Read operations on SymbolTable instance.
impl<K, V> SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Get the value for key.
    pub fn search<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| node.value.clone())
    }

    /// Check whether key is present in this table.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref();
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right_deref(),
                Ordering::Greater => nref.left_deref(),
                Ordering::Equal => return Some(nref),
            };
        }
        None
    }

    /// Return the `k`-th smallest key, counting from zero. Return None
    /// if `k` is not in `[0, len)`.
    pub fn select(&self, k: usize) -> Option<K> {
        let mut k = k;
        let mut node = self.root.as_deref();
        while let Some(nref) = node {
            let lsize = size(nref.left_deref());
            node = match k.cmp(&lsize) {
                Ordering::Less => nref.left_deref(),
                Ordering::Equal => return Some(nref.key.clone()),
                Ordering::Greater => {
                    k -= lsize + 1;
                    nref.right_deref()
                }
            };
        }
        None
    }

    /// Return the number of keys strictly less than `key`. The key
    /// itself need not be present. Return None for an empty table.
    pub fn rank<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.is_empty() {
            return None;
        }

        let mut node = self.root.as_deref();
        let mut rank = 0;
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Greater => nref.left_deref(),
                Ordering::Less => {
                    rank += size(nref.left_deref()) + 1;
                    nref.right_deref()
                }
                Ordering::Equal => {
                    rank += size(nref.left_deref());
                    break;
                }
            };
        }
        Some(rank)
    }

    /// Return keys ranked `a` through `b`, both inclusive, in ascending
    /// order. Return an empty vector when `a > b` or `b >= len`.
    pub fn range_by_rank(&self, a: usize, b: usize) -> Vec<K> {
        if a > b || b >= self.len() {
            return vec![];
        }
        self.iter()
            .skip(a)
            .take(b - a + 1)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Return an iterator over all entries in ascending key order.
    pub fn iter(&self) -> Iter<K, V> {
        let mut iter = Iter { stack: vec![] };
        iter.push_lefts(self.root.as_deref());
        iter
    }
}

impl<K, V> SymbolTable<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn do_insert(node: Option<Box<Node<K, V>>>, key: K, value: V) -> (Box<Node<K, V>>, Option<V>) {
        let mut node = match node {
            None => {
                trace!("insert: new leaf");
                return (Node::new(key, value, Color::Red), None);
            }
            Some(node) => node,
        };

        let old_value = match node.key.cmp(&key) {
            Ordering::Greater => {
                let (left, o) = Self::do_insert(node.left.take(), key, value);
                node.left = Some(left);
                o
            }
            Ordering::Less => {
                let (right, o) = Self::do_insert(node.right.take(), key, value);
                node.right = Some(right);
                o
            }
            Ordering::Equal => Some(mem::replace(&mut node.value, value)),
        };
        (balance(node), old_value)
    }

    fn do_delete<Q>(node: Option<Box<Node<K, V>>>, key: &Q) -> Delete<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };

        if node.key.borrow().gt(key) {
            let left = node.left_deref();
            if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
                node = move_red_left(node);
            }
            let (left, old_value) = Self::do_delete(node.left.take(), key);
            node.left = left;
            return (Some(balance(node)), old_value);
        }

        if is_red(node.left_deref()) {
            node = rotate_right(node);
        }

        if node.key.borrow().cmp(key) == Ordering::Equal && node.right.is_none() {
            // a leaf in LLRB, its left link is empty as well.
            let Node { value, .. } = *node;
            return (None, Some(value));
        }

        let right = node.right_deref();
        if !is_red(right) && !is_red(right.and_then(Node::left_deref)) {
            node = move_red_right(node);
        }

        if node.key.borrow().cmp(key) == Ordering::Equal {
            let (right, min) = Self::do_delete_min(node.right.take());
            node.right = right;
            let (min_key, min_value) = match min {
                Some(entry) => entry,
                None => panic!("do_delete(): no successor for inner node, call the programmer"),
            };
            trace!("delete: promote successor into inner node");
            node.key = min_key;
            let old_value = mem::replace(&mut node.value, min_value);
            (Some(balance(node)), Some(old_value))
        } else {
            let (right, old_value) = Self::do_delete(node.right.take(), key);
            node.right = right;
            (Some(balance(node)), old_value)
        }
    }

    fn do_delete_min(node: Option<Box<Node<K, V>>>) -> Delmin<K, V> {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };
        if node.left.is_none() {
            let Node { key, value, .. } = *node;
            return (None, Some((key, value)));
        }
        let left = node.left_deref();
        if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
            node = move_red_left(node);
        }
        let (left, entry) = Self::do_delete_min(node.left.take());
        node.left = left;
        (Some(balance(node)), entry)
    }
}

fn validate_tree<K, V>(
    node: Option<&Node<K, V>>,
    fromred: bool,
    mut nb: usize,
    depth: usize,
    (low, high): (Option<&K>, Option<&K>),
    depths: &mut Depth,
) -> Result<usize, Error<K>>
where
    K: Clone + Ord,
{
    let node = match node {
        None => {
            depths.sample(depth);
            return Ok(nb);
        }
        Some(node) => node,
    };

    let red = node.is_red();
    if fromred && red {
        return Err(Error::ConsecutiveReds);
    }
    if is_red(node.right_deref()) {
        return Err(Error::RightLeaningRed);
    }
    if !red {
        nb += 1;
    }

    match (low, high) {
        (Some(low), _) if node.key.le(low) => {
            return Err(Error::SortError(low.clone(), node.key.clone()));
        }
        (_, Some(high)) if node.key.ge(high) => {
            return Err(Error::SortError(node.key.clone(), high.clone()));
        }
        _ => (),
    }

    let (left, right) = (node.left_deref(), node.right_deref());
    let lbounds = (low, Some(&node.key));
    let rbounds = (Some(&node.key), high);
    let lblacks = validate_tree(left, red, nb, depth + 1, lbounds, depths)?;
    let rblacks = validate_tree(right, red, nb, depth + 1, rbounds, depths)?;
    if lblacks != rblacks {
        let err = format!("left: {} right: {}", lblacks, rblacks);
        return Err(Error::UnbalancedBlacks(err));
    }

    let expected = 1 + size(left) + size(right);
    if node.size != expected {
        let found = node.size;
        return Err(Error::SizeMismatch { expected, found });
    }
    Ok(lblacks)
}

fn height<K, V>(node: Option<&Node<K, V>>) -> isize {
    match node {
        None => -1,
        Some(node) => 1 + height(node.left_deref()).max(height(node.right_deref())),
    }
}

//--------- balancing primitives ----------------

fn balance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if is_red(node.right_deref()) {
        node = rotate_left(node);
    }
    let left = node.left_deref();
    if is_red(left) && is_red(left.and_then(Node::left_deref)) {
        node = rotate_right(node);
    }
    if is_red(node.left_deref()) && is_red(node.right_deref()) {
        flip_colors(node.deref_mut());
    }
    node.update_size();
    node
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//             /    (r)                 (r)  \
//            /       \                 /     \
//          left       x             node      xr
//                    / \            /  \
//                  xl   xr       left   xl
//
fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = match node.right.take() {
        Some(x) if x.is_red() => x,
        _ => panic!("rotate_left(): rotating a black link ? call the programmer"),
    };
    node.right = x.left.take();
    x.color = node.color;
    node.set_red();
    node.update_size();
    x.left = Some(node);
    x.update_size();
    x
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//            (r)   \                   (r)  \
//           /       \                 /      \
//          x       right             xl      node
//         / \                                / \
//       xl   xr                             xr  right
//
fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = match node.left.take() {
        Some(x) if x.is_red() => x,
        _ => panic!("rotate_right(): rotating a black link ? call the programmer"),
    };
    node.left = x.right.take();
    x.color = node.color;
    node.set_red();
    node.update_size();
    x.right = Some(node);
    x.update_size();
    x
}

//        (x)                   (!x)
//         |                     |
//        node                  node
//        / \                   / \
//      (y) (z)              (!y) (!z)
//     /      \              /      \
//   left    right         left    right
//
fn flip_colors<K, V>(node: &mut Node<K, V>) {
    if let Some(left) = node.left.as_mut() {
        left.toggle_link();
    }
    if let Some(right) = node.right.as_mut() {
        right.toggle_link();
    }
    node.toggle_link();
}

// Precondition: node is red, node.left and node.left.left are black.
// Makes node.left or one of its children red.
fn move_red_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    flip_colors(node.deref_mut());
    if is_red(node.right_deref().and_then(Node::left_deref)) {
        node.right = node.right.take().map(rotate_right);
        node = rotate_left(node);
        flip_colors(node.deref_mut());
    }
    node
}

// Precondition: node is red, node.right and node.right.left are black.
// Makes node.right or one of its children red.
fn move_red_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    flip_colors(node.deref_mut());
    if is_red(node.left_deref().and_then(Node::left_deref)) {
        node = rotate_right(node);
        flip_colors(node.deref_mut());
    }
    node
}

fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool {
    node.map_or(false, Node::is_red)
}

fn size<K, V>(node: Option<&Node<K, V>>) -> usize {
    node.map_or(0, |node| node.size)
}

/// In-order iterator over a [`SymbolTable`], yielding entries in
/// ascending key order.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_lefts(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(nref) = node {
            self.stack.push(nref);
            node = nref.left_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_lefts(node.right_deref());
        Some((&node.key, &node.value))
    }
}

/// Colour of the link from a node's parent into the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Node corresponds to a single entry in SymbolTable instance.
#[derive(Clone)]
pub struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    size: usize,                    // store: nodes in this subtree
    left: Option<Box<Node<K, V>>>,  // store: left child
    right: Option<Box<Node<K, V>>>, // store: right child
}

// Primary operations on a single node.
impl<K, V> Node<K, V> {
    // CREATE operation
    fn new(key: K, value: V, color: Color) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            color,
            size: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    fn left_deref(&self) -> Option<&Node<K, V>> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    fn right_deref(&self) -> Option<&Node<K, V>> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    fn update_size(&mut self) {
        self.size = 1 + size(self.left_deref()) + size(self.right_deref())
    }

    #[inline]
    fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    fn toggle_link(&mut self) {
        self.color = match self.color {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    #[inline]
    fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Read-only view of a node, for diagnostics.
impl<K, V> Node<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of nodes in the subtree rooted here, including itself.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn left(&self) -> Option<&Node<K, V>> {
        self.left_deref()
    }

    pub fn right(&self) -> Option<&Node<K, V>> {
        self.right_deref()
    }
}

#[cfg(test)]
impl<K, V> Node<K, V> {
    pub(crate) fn leaf(key: K, value: V, color: Color) -> Box<Node<K, V>> {
        Node::new(key, value, color)
    }

    pub(crate) fn link(
        mut self: Box<Self>,
        left: Option<Box<Node<K, V>>>,
        right: Option<Box<Node<K, V>>>,
    ) -> Box<Self> {
        self.left = left;
        self.right = right;
        self.update_size();
        self
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size
    }
}

#[cfg(test)]
impl<K, V> SymbolTable<K, V> {
    pub(crate) fn from_root(root: Box<Node<K, V>>) -> SymbolTable<K, V> {
        SymbolTable { root: Some(root) }
    }
}
