pub mod context;
pub mod environment;
mod tree;

pub use tree::TreeWalkInterpreter;

/// Where `print` statements write their output.
pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}
