pub mod carousel;
pub mod frame_loop;
pub mod loading_screen;
pub mod particle_field;
pub mod particles;
