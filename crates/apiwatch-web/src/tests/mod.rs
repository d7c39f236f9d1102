mod security;
mod source;
