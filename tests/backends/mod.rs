mod foundation_singleton;
