/*!
Breadth-first traversal along a chosen [`Direction`].

Following `Direction::In` walks the graph backwards, `Direction::All` ignores orientation,
which is what weakly connected components need.
*/

use std::collections::VecDeque;

use super::*;

/// A BFS traversal iterator visiting nodes reachable from one or more start nodes
pub struct BFS<'a, G>
where
    G: IncidenceList,
{
    graph: &'a G,
    direction: Direction,
    visited: Vec<bool>,
    queue: VecDeque<Node>,
}

impl<'a, G> BFS<'a, G>
where
    G: IncidenceList,
{
    /// Creates a new traversal starting from `start`
    pub fn new(graph: &'a G, start: Node, direction: Direction) -> Self {
        let mut visited = vec![false; graph.len()];
        visited[start as usize] = true;
        Self {
            graph,
            direction,
            visited,
            queue: VecDeque::from([start]),
        }
    }

    /// Tries to restart the search at a yet unvisited node and returns
    /// true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        assert!(self.queue.is_empty());
        match self.visited.iter().position(|&x| !x) {
            None => false,
            Some(x) => {
                self.visited[x] = true;
                self.queue.push_back(x as Node);
                true
            }
        }
    }
}

impl<G> Iterator for BFS<'_, G>
where
    G: IncidenceList,
{
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        let u = self.queue.pop_front()?;

        for v in self.graph.neighbors_of(u, self.direction) {
            if !self.visited[v as usize] {
                self.visited[v as usize] = true;
                self.queue.push_back(v);
            }
        }

        Some(u)
    }
}

/// Provides traversal methods on the graph itself
pub trait Traversal: IncidenceList + Sized {
    /// Returns an iterator that traverses nodes reachable from `start` along `direction`
    /// in **breadth-first search (BFS) order**.
    ///
    /// # Examples
    /// ```
    /// use netctrl::{prelude::*, algo::*};
    ///
    /// let g = Network::from_edges(3, [(0, 1), (2, 1)]);
    ///
    /// let order: Vec<_> = g.bfs(1, Direction::In).collect();
    /// assert_eq!(order, vec![1, 0, 2]);
    /// ```
    fn bfs(&self, start: Node, direction: Direction) -> BFS<'_, Self> {
        BFS::new(self, start, direction)
    }
}

impl<G: IncidenceList> Traversal for G {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::gens::GeneratorSubstructures;

    #[test]
    fn bfs_follows_direction() {
        let mut g = Network::new(5);
        g.connect_path([0, 1, 2, 3]);
        g.add_edge(4, 2);

        assert_eq!(g.bfs(1, Direction::Out).collect_vec(), vec![1, 2, 3]);
        assert_eq!(g.bfs(2, Direction::In).collect_vec(), vec![2, 1, 4, 0]);
        assert_eq!(g.bfs(4, Direction::All).count(), 5);
    }

    #[test]
    fn bfs_restart() {
        let g = Network::from_edges(4, [(0, 1), (2, 3)]);
        let mut bfs = g.bfs(0, Direction::All);
        assert_eq!(bfs.by_ref().count(), 2);
        assert!(bfs.try_restart_at_unvisited());
        assert_eq!(bfs.by_ref().collect_vec(), vec![2, 3]);
        assert!(!bfs.try_restart_at_unvisited());
    }
}
