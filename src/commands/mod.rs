// ABOUTME: Demonstration command modules proving out the external handler ABI

mod echo;
mod reverse;
