mod path_denial;
