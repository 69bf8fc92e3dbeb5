mod echo;
mod exec_large_output;
mod framing;
