pub mod particle_renderer;
