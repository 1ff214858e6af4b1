mod compositing;
mod executor;
