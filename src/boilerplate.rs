//! Window runner for small demos
#[cfg(not(target_arch = "wasm32"))]
pub mod desktop;

use std::rc::Rc;

use crate::Context;

pub trait Demo {
    type State;
    type Error;

    fn init(&mut self, gl: &Rc<Context>) -> Result<Self::State, Self::Error>;
    fn render(&mut self, gl: &Context, state: &mut Self::State) -> Result<(), Self::Error>;

    fn title(&self) -> String {
        "fogl demo".to_owned()
    }
}
