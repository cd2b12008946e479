//! CPG infrastructure

mod node_factory;

pub use node_factory::NodeFactory;
