mod quote_swap;
