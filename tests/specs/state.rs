mod scopes;
mod ttl;
