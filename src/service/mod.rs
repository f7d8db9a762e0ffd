pub mod conversation_controller;
pub mod flow;
pub mod replies;
