mod message;
mod responder;
