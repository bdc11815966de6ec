mod collections;
mod managing;
mod token;
mod trivia;
