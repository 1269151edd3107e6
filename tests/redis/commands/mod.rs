mod echo;
mod transaction;
mod wait;
mod xadd;
mod xrange;
