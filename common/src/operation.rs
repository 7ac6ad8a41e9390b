use std::fmt;

/// One of the three routing keys the broker binds the service's queue to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Invoice,
    Withdraw,
    Balance,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Invoice, Operation::Withdraw, Operation::Balance];

    pub const fn routing_key(self) -> &'static str {
        match self {
            Operation::Invoice => "invoice",
            Operation::Withdraw => "withdraw",
            Operation::Balance => "balance",
        }
    }

    pub fn from_routing_key(key: &str) -> Option<Self> {
        match key {
            "invoice" => Some(Operation::Invoice),
            "withdraw" => Some(Operation::Withdraw),
            "balance" => Some(Operation::Balance),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.routing_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_known_routing_key() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_routing_key(op.routing_key()), Some(op));
        }
    }

    #[test]
    fn rejects_unknown_routing_key() {
        assert_eq!(Operation::from_routing_key("foo"), None);
    }
}
