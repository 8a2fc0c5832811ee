pub mod lie;
