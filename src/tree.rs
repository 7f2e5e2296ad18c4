//! Module to build the Huffman code tree.
//!
//! Nodes are kept in a pool and refer to their children by index, the root index is
//! tracked separately.  The tree is built bottom-up by re-sorting the working list and
//! merging the two entries at the end of it, until one entry is left.  This is quadratic,
//! which is fine for an alphabet of at most 256 symbols.

use std::collections::HashMap;
use crate::frequency::{FrequencyEntry,FrequencyTable,descending_by_key,descending_by_frequency};

/// Code given to the only symbol when the alphabet has one symbol.
/// There is no path to follow in that case, since the root is the leaf.
pub const SINGLE_SYMBOL_CODE: &str = "0";

#[derive(Clone,Debug)]
pub struct TreeNode {
    pub entry: FrequencyEntry,
    /// indices of the left and right children, a leaf has none
    children: Option<[usize;2]>
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
    pub fn left(&self) -> Option<usize> {
        self.children.map(|c| c[0])
    }
    pub fn right(&self) -> Option<usize> {
        self.children.map(|c| c[1])
    }
}

#[derive(Clone,Debug,Default)]
pub struct CodeTree {
    pool: Vec<TreeNode>,
    root: Option<usize>
}

impl CodeTree {
    /// Build the tree from the leaves in the frequency table.
    /// The table itself is not consumed, we work on a list of indices into the pool.
    pub fn build(table: &FrequencyTable) -> Self {
        let mut pool: Vec<TreeNode> = table.entries().iter().map(|e| TreeNode {
            entry: e.clone(),
            children: None
        }).collect();
        let mut work: Vec<usize> = (0..pool.len()).collect();
        while work.len() > 1 {
            work.sort_by(|a,b| descending_by_key(&pool[*a].entry,&pool[*b].entry));
            work.sort_by(|a,b| descending_by_frequency(&pool[*a].entry,&pool[*b].entry));
            // `work` has at least 2 elements here
            let top = work[work.len()-1];
            let bottom = work[work.len()-2];
            let parent = TreeNode {
                entry: FrequencyEntry::merge(&pool[bottom].entry,&pool[top].entry),
                children: Some([bottom,top])
            };
            log::trace!("merge {:?} and {:?} with frequency {}",
                String::from_utf8_lossy(&pool[bottom].entry.key),
                String::from_utf8_lossy(&pool[top].entry.key),
                parent.entry.frequency);
            work.truncate(work.len()-2);
            work.push(pool.len());
            pool.push(parent);
        }
        let root = work.first().copied();
        log::debug!("code tree has {} nodes",pool.len());
        Self {
            pool,
            root
        }
    }
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.map(|r| &self.pool[r])
    }
    pub fn node(&self,index: usize) -> Option<&TreeNode> {
        self.pool.get(index)
    }
    /// number of nodes, leaves and branches
    pub fn len(&self) -> usize {
        self.pool.len()
    }
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
    /// Visit every node once, left subtree, then right subtree, then the node itself
    pub fn post_order<F>(&self,mut callback: F) where F: FnMut(&TreeNode) {
        if let Some(root) = self.root {
            self.post_order_from(root,&mut callback);
        }
    }
    fn post_order_from<F>(&self,index: usize,callback: &mut F) where F: FnMut(&TreeNode) {
        let node = &self.pool[index];
        if let Some([left,right]) = node.children {
            self.post_order_from(left,callback);
            self.post_order_from(right,callback);
        }
        callback(node);
    }
    /// Walk from the root to every leaf, appending `0` for a left turn and `1` for a right turn.
    /// Returns the path of each leaf's symbol.
    pub fn paths(&self) -> HashMap<u8,String> {
        let mut ans = HashMap::new();
        let mut stack: Vec<(usize,String)> = match self.root {
            Some(root) => vec![(root,String::new())],
            None => return ans
        };
        while let Some((index,path)) = stack.pop() {
            let node = &self.pool[index];
            match node.children {
                Some([left,right]) => {
                    stack.push((right,path.clone() + "1"));
                    stack.push((left,path + "0"));
                },
                None => {
                    let code = match path.is_empty() {
                        true => SINGLE_SYMBOL_CODE.to_string(),
                        false => path
                    };
                    if let Some(symbol) = node.entry.key.first() {
                        ans.insert(*symbol,code);
                    }
                }
            }
        }
        ans
    }
}

#[cfg(test)]
fn keys_of(tree: &CodeTree) -> Vec<String> {
    let mut ans = Vec::new();
    tree.post_order(|n| ans.push(String::from_utf8_lossy(&n.entry.key).to_string()));
    ans
}

#[test]
fn merge_order() {
    let tree = CodeTree::build(&FrequencyTable::from_text("abracadabra".as_bytes()));
    assert_eq!(tree.len(),9);
    assert_eq!(keys_of(&tree),vec!["d","c","dc","b","dcb","r","dcbr","a","dcbra"]);
    let root = tree.root().expect("no root");
    assert_eq!(root.entry.frequency,11);
}

#[test]
fn paths_work() {
    let tree = CodeTree::build(&FrequencyTable::from_text("abracadabra".as_bytes()));
    let paths = tree.paths();
    assert_eq!(paths.len(),5);
    assert_eq!(paths[&b'a'],"1");
    assert_eq!(paths[&b'r'],"01");
    assert_eq!(paths[&b'b'],"001");
    assert_eq!(paths[&b'd'],"0000");
    assert_eq!(paths[&b'c'],"0001");
}

#[test]
fn paths_agree_with_key_search() {
    // descending by substring search on the merged keys has to land on the same leaves
    let text = "It was the best of times, it was the worst of times.\r\n".as_bytes();
    let tree = CodeTree::build(&FrequencyTable::from_text(text));
    for (symbol,code) in tree.paths() {
        let mut node = tree.root().expect("no root");
        let mut path = String::new();
        while !node.is_leaf() {
            let left = tree.node(node.left().unwrap()).unwrap();
            let right = tree.node(node.right().unwrap()).unwrap();
            if left.entry.key.contains(&symbol) {
                path += "0";
                node = left;
            } else {
                assert!(right.entry.key.contains(&symbol));
                path += "1";
                node = right;
            }
        }
        assert_eq!(node.entry.key,vec![symbol]);
        assert_eq!(path,code);
    }
}

#[test]
fn equal_frequencies() {
    let tree = CodeTree::build(&FrequencyTable::from_text("aaaabbbb".as_bytes()));
    assert_eq!(keys_of(&tree),vec!["b","a","ba"]);
}

#[test]
fn single_symbol() {
    let tree = CodeTree::build(&FrequencyTable::from_text("zzzz".as_bytes()));
    assert_eq!(tree.len(),1);
    assert!(tree.root().expect("no root").is_leaf());
    assert_eq!(tree.paths()[&b'z'],SINGLE_SYMBOL_CODE);
}

#[test]
fn empty_tree() {
    let tree = CodeTree::build(&FrequencyTable::from_text(&[]));
    assert!(tree.is_empty());
    assert!(tree.paths().is_empty());
    let mut count = 0;
    tree.post_order(|_| count += 1);
    assert_eq!(count,0);
}

#[test]
fn every_node_visited_once() {
    let text = "the quick brown fox jumps over the lazy dog".as_bytes();
    let table = FrequencyTable::from_text(text);
    let tree = CodeTree::build(&table);
    let mut count = 0;
    let mut leaves = 0;
    tree.post_order(|n| {
        count += 1;
        if n.is_leaf() {
            leaves += 1;
        }
    });
    assert_eq!(leaves,table.len());
    assert_eq!(count,2*table.len()-1);
    assert_eq!(count,tree.len());
}

#[test]
fn deterministic() {
    let text = "she sells sea shells by the sea shore\n".as_bytes();
    let t1 = CodeTree::build(&FrequencyTable::from_text(text));
    let t2 = CodeTree::build(&FrequencyTable::from_text(text));
    assert_eq!(keys_of(&t1),keys_of(&t2));
    assert_eq!(t1.paths(),t2.paths());
}
